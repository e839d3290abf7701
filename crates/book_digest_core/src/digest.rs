//! crates/book_digest_core/src/digest.rs
//!
//! Assembles the daily digest for one user: a quote per selected book plus
//! the four digest sections. Per-book failures are soft and recorded; calls
//! run strictly one at a time so every failure is attributable to exactly
//! one book.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::domain::{
    BookQuote, BookRef, CrossBookConnection, DigestResult, DigestSections, FailedBook,
    PonderEntry, SnippetEntry,
};
use crate::ports::{ContentGeneration, GenerationError, GenerationResult};

/// Upper bound on books drawn for the snippet section.
pub const MAX_SNIPPET_BOOKS: usize = 5;

pub struct DigestOrchestrator {
    service: Arc<dyn ContentGeneration>,
    rng: Mutex<StdRng>,
}

impl DigestOrchestrator {
    pub fn new(service: Arc<dyn ContentGeneration>) -> Self {
        Self::with_rng(service, StdRng::from_entropy())
    }

    /// Constructor with an explicit random source for deterministic tests.
    pub fn with_rng(service: Arc<dyn ContentGeneration>, rng: StdRng) -> Self {
        Self {
            service,
            rng: Mutex::new(rng),
        }
    }

    fn with_rng_locked<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }

    /// Generates the full digest payload for one user's reading list.
    pub async fn generate_daily_quotes(
        &self,
        books: &[BookRef],
        max_books: Option<usize>,
    ) -> DigestResult {
        if books.is_empty() {
            return DigestResult {
                success: false,
                quotes: Vec::new(),
                failed_books: Vec::new(),
                digest_sections: DigestSections::default(),
                message: "User has no books in their reading list.".to_string(),
            };
        }

        let selected = self.select_random_books(books, max_books);
        let mut quotes = Vec::new();
        let mut failed_books = Vec::new();

        for book in &selected {
            match self.generate_quote_for_specific_book(book).await {
                Ok(content) => quotes.push(BookQuote {
                    book: book.clone(),
                    quote_content: content.content,
                    generated_at: Utc::now(),
                }),
                Err(error) => {
                    tracing::warn!(
                        book = %book.title,
                        error = %error,
                        "failed to generate quote for daily digest"
                    );
                    failed_books.push(FailedBook {
                        book: book.clone(),
                        error: error.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            books_selected = selected.len(),
            quotes_generated = quotes.len(),
            failed_books = failed_books.len(),
            "daily quotes generation completed"
        );

        let digest_sections = self.generate_digest_sections(&selected).await;

        let message = build_result_message(quotes.len(), failed_books.len());
        DigestResult {
            success: !quotes.is_empty() || !digest_sections.is_empty(),
            quotes,
            failed_books,
            digest_sections,
            message,
        }
    }

    /// Validates book identity before delegating to the content service.
    pub async fn generate_quote_for_specific_book(&self, book: &BookRef) -> GenerationResult {
        if book.title.is_empty() || book.author.is_empty() {
            return Err(GenerationError::InvalidInput(
                "Invalid book data: title and author are required.".to_string(),
            ));
        }

        let result = self.service.generate_quote(book).await;
        if let Ok(content) = &result {
            tracing::debug!(
                book = %book.title,
                quote_length = content.content.len(),
                "quote generated successfully"
            );
        }
        result
    }

    /// Uniform selection without replacement; `None` means all books.
    fn select_random_books(&self, books: &[BookRef], max_books: Option<usize>) -> Vec<BookRef> {
        let Some(max_books) = max_books else {
            return books.to_vec();
        };

        let count = max_books.min(books.len());
        if books.len() <= count {
            return books.to_vec();
        }

        self.with_rng_locked(|rng| books.choose_multiple(rng, count).cloned().collect())
    }

    /// Builds the four digest sections from the selected subset. Sections
    /// that fail are simply absent; the digest still goes out.
    async fn generate_digest_sections(&self, selected: &[BookRef]) -> DigestSections {
        let mut sections = DigestSections::default();
        if selected.is_empty() {
            return sections;
        }

        // Today's snippet: an independent random draw from the selection.
        let snippet_books: Vec<BookRef> = self.with_rng_locked(|rng| {
            selected
                .choose_multiple(rng, MAX_SNIPPET_BOOKS.min(selected.len()))
                .cloned()
                .collect()
        });
        for book in snippet_books {
            if let Ok(content) = self.service.generate_todays_snippet(&book).await {
                sections.todays_snippet.push(SnippetEntry {
                    book,
                    content: content.content,
                });
            }
        }

        // Cross-book connection: the first three books in selection order.
        if selected.len() >= 2 {
            let connection_books = &selected[..selected.len().min(3)];
            if let Ok(content) = self
                .service
                .generate_cross_book_connection(connection_books)
                .await
            {
                let titles = connection_books
                    .iter()
                    .map(|book| book.title.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                sections.cross_book_connection = Some(CrossBookConnection {
                    content: content.content,
                    books: titles,
                });
            }
        }

        // Quote to ponder: one random book, which may repeat a snippet book.
        if let Some(book) = self.with_rng_locked(|rng| selected.choose(rng).cloned()) {
            if let Ok(content) = self.service.generate_quote_to_ponder(&book).await {
                sections.quote_to_ponder = Some(PonderEntry {
                    book,
                    content: content.content,
                });
            }
        }

        // Today's reflection: grounded in the whole selection.
        if let Ok(content) = self.service.generate_todays_reflection(selected).await {
            sections.todays_reflection = Some(content.content);
        }

        tracing::info!(
            snippets = sections.todays_snippet.len(),
            has_connection = sections.cross_book_connection.is_some(),
            has_ponder = sections.quote_to_ponder.is_some(),
            has_reflection = sections.todays_reflection.is_some(),
            "digest sections generated"
        );

        sections
    }
}

fn build_result_message(success_count: usize, failure_count: usize) -> String {
    match (success_count, failure_count) {
        (0, 0) => "No books were processed.".to_string(),
        (s, 0) => format!("Successfully generated {s} quote(s)."),
        (0, f) => format!("Failed to generate quotes for all {f} selected book(s)."),
        (s, f) => format!("Generated {s} quote(s) successfully, failed for {f} book(s)."),
    }
}
