//! crates/book_digest_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or HTTP transport; the
//! digest result types serialize to the shape the email renderer expects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The minimal book identity the core operates on. Never persisted here;
/// the reading-list store hands these in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRef {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl BookRef {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            description: None,
        }
    }

    pub fn with_description(
        title: impl Into<String>,
        author: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            description: Some(description.into()),
        }
    }
}

/// The kind of content a generation request produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Quote,
    Snippet,
    Connection,
    QuoteToPonder,
    Reflection,
    BookInfo,
}

impl ContentKind {
    /// Short label used in log context.
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Quote => "quote",
            ContentKind::Snippet => "snippet",
            ContentKind::Connection => "connection",
            ContentKind::QuoteToPonder => "quote_to_ponder",
            ContentKind::Reflection => "reflection",
            ContentKind::BookInfo => "book_info",
        }
    }
}

/// Where a successful piece of content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    ProviderApi,
    Fallback,
}

/// A successfully generated piece of content. Content is always non-empty:
/// empty provider output is converted to a fallback before this is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub content: String,
    pub source: ContentSource,
}

impl GeneratedContent {
    pub fn provider(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: ContentSource::ProviderApi,
        }
    }

    pub fn fallback(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: ContentSource::Fallback,
        }
    }
}

/// One autocomplete suggestion parsed from provider output or served from
/// the offline catalog. Fields are deliberately lenient: suggestions are
/// never validated against a canonical book database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSuggestion {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub description: String,
}

//=========================================================================================
// Digest Result Types
//=========================================================================================

/// A quote generated for one book in the daily digest.
#[derive(Debug, Clone, Serialize)]
pub struct BookQuote {
    pub book: BookRef,
    pub quote_content: String,
    pub generated_at: DateTime<Utc>,
}

/// A book the digest run could not generate a quote for, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct FailedBook {
    pub book: BookRef,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SnippetEntry {
    pub book: BookRef,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrossBookConnection {
    pub content: String,
    /// Comma-separated titles of the books the connection draws on.
    pub books: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PonderEntry {
    pub book: BookRef,
    pub content: String,
}

/// The four optional sections of the daily digest, built fresh per run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DigestSections {
    pub todays_snippet: Vec<SnippetEntry>,
    pub cross_book_connection: Option<CrossBookConnection>,
    pub quote_to_ponder: Option<PonderEntry>,
    pub todays_reflection: Option<String>,
}

impl DigestSections {
    /// True when no section produced any content.
    pub fn is_empty(&self) -> bool {
        self.todays_snippet.is_empty()
            && self.cross_book_connection.is_none()
            && self.quote_to_ponder.is_none()
            && self.todays_reflection.is_none()
    }
}

/// The aggregated payload of one digest run, handed to the email renderer.
#[derive(Debug, Clone, Serialize)]
pub struct DigestResult {
    pub success: bool,
    pub quotes: Vec<BookQuote>,
    pub failed_books: Vec<FailedBook>,
    pub digest_sections: DigestSections,
    pub message: String,
}
