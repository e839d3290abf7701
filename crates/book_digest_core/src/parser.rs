//! crates/book_digest_core/src/parser.rs
//!
//! Defensive parsing of unreliable upstream output. Models wrap the JSON we
//! asked for in conversational filler often enough that the book-info parser
//! slices from the first `{` to the last `}` before decoding.

use serde::Deserialize;

use crate::domain::BookSuggestion;

/// Returned when no parseable suggestion payload could be located. This is
/// a parse failure, not a system error; the content service converts it
/// into a fallback lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Could not parse book information from response.")]
pub struct BookInfoParseError;

#[derive(Deserialize)]
struct BookInfoPayload {
    suggestions: serde_json::Value,
}

/// Extracts book suggestions from free-form model output.
///
/// Succeeds only if the sliced substring decodes as JSON and carries a
/// `suggestions` array. Intentionally lenient beyond that: per-suggestion
/// fields default when absent.
pub fn parse_book_info_response(raw: &str) -> Result<Vec<BookSuggestion>, BookInfoParseError> {
    let start = raw.find('{').ok_or(BookInfoParseError)?;
    let end = raw.rfind('}').ok_or(BookInfoParseError)?;
    if end < start {
        return Err(BookInfoParseError);
    }

    let payload: BookInfoPayload =
        serde_json::from_str(&raw[start..=end]).map_err(|_| BookInfoParseError)?;

    if !payload.suggestions.is_array() {
        return Err(BookInfoParseError);
    }

    serde_json::from_value(payload.suggestions).map_err(|_| BookInfoParseError)
}

/// Trims plain-text provider output, treating whitespace-only text as
/// absent so the caller can fall back instead of returning empty success.
pub fn non_empty_text(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
