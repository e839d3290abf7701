//! crates/book_digest_core/src/service.rs
//!
//! The provider-agnostic content service. Every operation follows the same
//! shape: validate inputs, check provider availability, build a prompt,
//! invoke the transport, parse the output, and fall back to the offline
//! catalog on any provider-side failure. Callers never see a provider
//! error; the only unmasked failure mode is input validation.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::{BookRef, BookSuggestion, ContentKind, GeneratedContent};
use crate::ports::{
    ContentGeneration, GenerationError, GenerationParams, GenerationResult, ProviderClient,
};
use crate::{fallback, parser, prompt};

/// Minimum length of a trimmed partial title for autocomplete.
pub const MIN_TITLE_LENGTH: usize = 3;

/// Book-info calls run cooler and smaller than content generation.
const BOOK_INFO_TEMPERATURE: f32 = 0.3;
const BOOK_INFO_MAX_TOKENS: u32 = 1000;

/// One content service per provider, parameterized by its transport.
pub struct ContentService<C> {
    client: C,
    rng: Mutex<StdRng>,
}

impl<C: ProviderClient> ContentService<C> {
    pub fn new(client: C) -> Self {
        Self::with_rng(client, StdRng::from_entropy())
    }

    /// Constructor with an explicit random source, used by tests to make
    /// prompt variety and fallback selection deterministic.
    pub fn with_rng(client: C, rng: StdRng) -> Self {
        Self {
            client,
            rng: Mutex::new(rng),
        }
    }

    fn with_rng_locked<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }

    /// Shared tail of every plain-text operation: invoke, trim, and fall
    /// back on transport failure or empty output.
    async fn request_content(
        &self,
        kind: ContentKind,
        prompt: String,
        fallback: GeneratedContent,
    ) -> GenerationResult {
        match self.client.invoke(&prompt, GenerationParams::defaults()).await {
            Ok(raw) => match parser::non_empty_text(&raw) {
                Some(text) => Ok(GeneratedContent::provider(text)),
                None => {
                    tracing::warn!(
                        provider = self.client.provider_name(),
                        kind = kind.as_str(),
                        "empty content received from provider"
                    );
                    Ok(fallback)
                }
            },
            Err(failure) => {
                tracing::error!(
                    provider = self.client.provider_name(),
                    kind = kind.as_str(),
                    error = %failure,
                    "provider request failed"
                );
                Ok(fallback)
            }
        }
    }

    fn log_fallback_for_unavailable(&self, kind: ContentKind) {
        tracing::info!(
            provider = self.client.provider_name(),
            kind = kind.as_str(),
            "using fallback content due to missing API configuration"
        );
    }
}

fn require_title_and_author(book: &BookRef, message: &str) -> Result<(), GenerationError> {
    if book.title.is_empty() || book.author.is_empty() {
        tracing::warn!(
            title_empty = book.title.is_empty(),
            author_empty = book.author.is_empty(),
            "invalid input for content generation"
        );
        return Err(GenerationError::InvalidInput(message.to_string()));
    }
    Ok(())
}

#[async_trait]
impl<C: ProviderClient> ContentGeneration for ContentService<C> {
    async fn generate_quote(&self, book: &BookRef) -> GenerationResult {
        require_title_and_author(
            book,
            "Book title and author are required for quote generation.",
        )?;

        let fallback = fallback::quote(&book.title, &book.author);
        if !self.client.is_available() {
            self.log_fallback_for_unavailable(ContentKind::Quote);
            return Ok(fallback);
        }

        let prompt = self.with_rng_locked(|rng| prompt::quote_prompt(rng, book));
        self.request_content(ContentKind::Quote, prompt, fallback).await
    }

    async fn generate_todays_snippet(&self, book: &BookRef) -> GenerationResult {
        require_title_and_author(book, "Book title and author are required.")?;

        let fallback = fallback::snippet(&book.title, &book.author);
        if !self.client.is_available() {
            self.log_fallback_for_unavailable(ContentKind::Snippet);
            return Ok(fallback);
        }

        let prompt = self.with_rng_locked(|rng| prompt::snippet_prompt(rng, book));
        self.request_content(ContentKind::Snippet, prompt, fallback).await
    }

    async fn generate_cross_book_connection(&self, books: &[BookRef]) -> GenerationResult {
        if books.len() < 2 {
            return Err(GenerationError::InvalidInput(
                "At least 2 books are required for cross-book connections.".to_string(),
            ));
        }

        let fallback = fallback::connection(books);
        if !self.client.is_available() {
            self.log_fallback_for_unavailable(ContentKind::Connection);
            return Ok(fallback);
        }

        let prompt = prompt::connection_prompt(books);
        self.request_content(ContentKind::Connection, prompt, fallback).await
    }

    async fn generate_quote_to_ponder(&self, book: &BookRef) -> GenerationResult {
        require_title_and_author(book, "Book title and author are required.")?;

        let fallback = fallback::quote_to_ponder(&book.title, &book.author);
        if !self.client.is_available() {
            self.log_fallback_for_unavailable(ContentKind::QuoteToPonder);
            return Ok(fallback);
        }

        let prompt = self.with_rng_locked(|rng| prompt::quote_to_ponder_prompt(rng, book));
        self.request_content(ContentKind::QuoteToPonder, prompt, fallback)
            .await
    }

    async fn generate_todays_reflection(&self, books: &[BookRef]) -> GenerationResult {
        if books.is_empty() {
            return Err(GenerationError::InvalidInput(
                "At least one book is required for reflection.".to_string(),
            ));
        }

        let fallback = self.with_rng_locked(fallback::reflection);
        if !self.client.is_available() {
            self.log_fallback_for_unavailable(ContentKind::Reflection);
            return Ok(fallback);
        }

        let prompt = prompt::reflection_prompt(books);
        self.request_content(ContentKind::Reflection, prompt, fallback)
            .await
    }

    async fn get_book_info(
        &self,
        partial_title: &str,
    ) -> Result<Vec<BookSuggestion>, GenerationError> {
        if partial_title.trim().chars().count() < MIN_TITLE_LENGTH {
            return Err(GenerationError::InvalidInput(format!(
                "Title must be at least {MIN_TITLE_LENGTH} characters long."
            )));
        }

        if !self.client.is_available() {
            self.log_fallback_for_unavailable(ContentKind::BookInfo);
            return Ok(fallback::book_suggestions(partial_title));
        }

        let prompt = prompt::book_info_prompt(partial_title);
        let params = GenerationParams {
            temperature: Some(BOOK_INFO_TEMPERATURE),
            max_tokens: Some(BOOK_INFO_MAX_TOKENS),
        };

        match self.client.invoke(&prompt, params).await {
            Ok(raw) => match parser::parse_book_info_response(&raw) {
                Ok(suggestions) => Ok(suggestions),
                Err(parse_error) => {
                    tracing::warn!(
                        provider = self.client.provider_name(),
                        partial_title,
                        error = %parse_error,
                        "failed to parse book info response"
                    );
                    Ok(fallback::book_suggestions(partial_title))
                }
            },
            Err(failure) => {
                tracing::error!(
                    provider = self.client.provider_name(),
                    partial_title,
                    error = %failure,
                    "provider request failed for book info"
                );
                Ok(fallback::book_suggestions(partial_title))
            }
        }
    }

    fn is_available(&self) -> bool {
        self.client.is_available()
    }

    fn provider_name(&self) -> String {
        self.client.provider_name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ContentSource;
    use crate::ports::ProviderFailure;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Transport stub that records how many calls were issued.
    struct MockClient {
        available: bool,
        response: Result<String, ProviderFailure>,
        calls: Arc<AtomicUsize>,
    }

    impl MockClient {
        fn replying(response: Result<String, ProviderFailure>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    available: true,
                    response,
                    calls: calls.clone(),
                },
                calls,
            )
        }

        fn unavailable() -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    available: false,
                    response: Ok("should never be used".to_string()),
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl ProviderClient for MockClient {
        async fn invoke(
            &self,
            _prompt: &str,
            _params: GenerationParams,
        ) -> Result<String, ProviderFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone()
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn provider_name(&self) -> &str {
            "mock"
        }
    }

    fn service(client: MockClient) -> ContentService<MockClient> {
        ContentService::with_rng(client, StdRng::seed_from_u64(99))
    }

    fn gatsby() -> BookRef {
        BookRef::new("The Great Gatsby", "F. Scott Fitzgerald")
    }

    #[tokio::test]
    async fn validation_precedes_provider_call() {
        let (client, calls) = MockClient::replying(Ok("irrelevant".to_string()));
        let svc = service(client);

        for book in [BookRef::new("", "Author"), BookRef::new("Title", "")] {
            let err = svc.generate_quote(&book).await.unwrap_err();
            assert_eq!(
                err,
                GenerationError::InvalidInput(
                    "Book title and author are required for quote generation.".to_string()
                )
            );
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unavailable_provider_always_falls_back() {
        let (client, calls) = MockClient::unavailable();
        let svc = service(client);
        let book = gatsby();

        let quote = svc.generate_quote(&book).await.unwrap();
        let snippet = svc.generate_todays_snippet(&book).await.unwrap();
        let ponder = svc.generate_quote_to_ponder(&book).await.unwrap();

        for result in [quote, snippet, ponder] {
            assert_eq!(result.source, ContentSource::Fallback);
            assert!(!result.content.is_empty());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_provider_output_triggers_fallback() {
        let (client, _) = MockClient::replying(Ok("   \n ".to_string()));
        let svc = service(client);

        let result = svc.generate_quote(&gatsby()).await.unwrap();
        assert_eq!(result.source, ContentSource::Fallback);
        assert!(result.content.contains("So we beat on"));
    }

    #[tokio::test]
    async fn provider_failure_triggers_fallback() {
        let (client, _) = MockClient::replying(Err(ProviderFailure::Http {
            status: 503,
            body: "overloaded".to_string(),
        }));
        let svc = service(client);

        let result = svc.generate_todays_snippet(&gatsby()).await.unwrap();
        assert_eq!(result.source, ContentSource::Fallback);
        assert!(!result.content.is_empty());
    }

    #[tokio::test]
    async fn successful_output_is_trimmed_provider_content() {
        let (client, calls) = MockClient::replying(Ok("  an actual passage  ".to_string()));
        let svc = service(client);

        let result = svc.generate_quote(&gatsby()).await.unwrap();
        assert_eq!(result.content, "an actual passage");
        assert_eq!(result.source, ContentSource::ProviderApi);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn connection_requires_two_books() {
        let (client, calls) = MockClient::replying(Ok("a connection".to_string()));
        let svc = service(client);

        let err = svc
            .generate_cross_book_connection(&[gatsby()])
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GenerationError::InvalidInput(
                "At least 2 books are required for cross-book connections.".to_string()
            )
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let books = [gatsby(), BookRef::new("1984", "George Orwell")];
        let result = svc.generate_cross_book_connection(&books).await.unwrap();
        assert_eq!(result.source, ContentSource::ProviderApi);
    }

    #[tokio::test]
    async fn reflection_requires_at_least_one_book() {
        let (client, _) = MockClient::replying(Ok("reflect".to_string()));
        let svc = service(client);

        let err = svc.generate_todays_reflection(&[]).await.unwrap_err();
        assert_eq!(
            err,
            GenerationError::InvalidInput(
                "At least one book is required for reflection.".to_string()
            )
        );
    }

    #[tokio::test]
    async fn short_partial_title_is_rejected_without_provider_call() {
        let (client, calls) = MockClient::replying(Ok("irrelevant".to_string()));
        let svc = service(client);

        let err = svc.get_book_info("ab").await.unwrap_err();
        assert_eq!(
            err,
            GenerationError::InvalidInput("Title must be at least 3 characters long.".to_string())
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        // Whitespace padding does not count toward the minimum.
        assert!(svc.get_book_info("  a  ").await.is_err());
    }

    #[tokio::test]
    async fn book_info_parses_json_from_conversational_output() {
        let raw = "Sure! {\"suggestions\":[{\"title\":\"X\",\"author\":\"Y\",\
                   \"publication_year\":2000,\"genre\":\"G\",\"description\":\"D\"}]} Hope that helps!";
        let (client, _) = MockClient::replying(Ok(raw.to_string()));
        let svc = service(client);

        let suggestions = svc.get_book_info("some title").await.unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].title, "X");
    }

    #[tokio::test]
    async fn unparseable_book_info_falls_back_to_catalog() {
        let (client, _) = MockClient::replying(Ok("no json at all".to_string()));
        let svc = service(client);

        let suggestions = svc.get_book_info("great gatsby").await.unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].title, "The Great Gatsby");
    }

    #[tokio::test]
    async fn book_info_no_match_fallback_is_empty_success() {
        let (client, _) = MockClient::unavailable();
        let svc = service(client);

        let suggestions = svc.get_book_info("moby dick").await.unwrap();
        assert!(suggestions.is_empty());
    }
}
