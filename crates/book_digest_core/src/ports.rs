//! crates/book_digest_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific provider HTTP APIs.

use async_trait::async_trait;

use crate::domain::{BookRef, BookSuggestion, GeneratedContent};

//=========================================================================================
// Provider Transport Port
//=========================================================================================

/// A failure reported by a provider transport. "Provider failed" is a normal
/// control-flow value here, not an exception; the content service decides
/// what to do with it (always: log, then fall back).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderFailure {
    /// The request never completed (connection refused, DNS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider answered with a non-success HTTP status. Body is kept
    /// for diagnostics only.
    #[error("provider returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be decoded into the provider's schema.
    #[error("malformed provider payload: {0}")]
    MalformedPayload(String),

    /// A well-formed response that contains no candidate text at all.
    #[error("provider response contained no text")]
    EmptyResponse,

    /// The provider withheld all candidates because of its content-safety
    /// filter. Logged distinctly, handled identically to other failures.
    #[error("content filtered by provider: {reason}")]
    ContentFiltered { reason: String },
}

/// Generation parameters for a single provider call. `None` means "use the
/// value the provider was configured with".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationParams {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl GenerationParams {
    /// The provider's configured defaults.
    pub fn defaults() -> Self {
        Self::default()
    }
}

/// Wraps one upstream text-generation HTTP API.
///
/// Exactly one outbound call per invocation, no internal retries: a single
/// failure immediately yields `Err`. On success the implementation returns
/// the first candidate's raw text, untrimmed.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    async fn invoke(&self, prompt: &str, params: GenerationParams) -> Result<String, ProviderFailure>;

    /// Pure function of the provider's configuration: enabled, key present,
    /// key not the documented placeholder.
    fn is_available(&self) -> bool;

    /// Used for logging and diagnostics only; callers never branch on it.
    fn provider_name(&self) -> &str;
}

//=========================================================================================
// Content Generation Port
//=========================================================================================

/// An error surfaced directly to the caller of a generation operation.
///
/// Provider-side problems never appear here; they are masked by fallback
/// content. The only unmasked failure mode is input validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// The caller supplied input the operation cannot work with. No
    /// fallback is attempted: substitute content would be meaningless
    /// without valid identifying input.
    #[error("{0}")]
    InvalidInput(String),

    /// An unexpected failure outside the provider/fallback path.
    #[error("{0}")]
    Failed(String),
}

/// A convenience type alias for generation operations.
pub type GenerationResult = Result<GeneratedContent, GenerationError>;

/// The shared capability contract every AI content service implements,
/// one instance per provider.
#[async_trait]
pub trait ContentGeneration: Send + Sync {
    async fn generate_quote(&self, book: &BookRef) -> GenerationResult;

    async fn generate_todays_snippet(&self, book: &BookRef) -> GenerationResult;

    /// Requires at least 2 books.
    async fn generate_cross_book_connection(&self, books: &[BookRef]) -> GenerationResult;

    async fn generate_quote_to_ponder(&self, book: &BookRef) -> GenerationResult;

    /// Requires at least 1 book.
    async fn generate_todays_reflection(&self, books: &[BookRef]) -> GenerationResult;

    /// Requires a trimmed partial title of at least 3 characters. An empty
    /// suggestion list is a valid "no match" outcome, not an error.
    async fn get_book_info(&self, partial_title: &str)
        -> Result<Vec<BookSuggestion>, GenerationError>;

    fn is_available(&self) -> bool;

    fn provider_name(&self) -> String;
}
