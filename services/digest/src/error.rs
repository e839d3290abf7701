//! services/digest/src/error.rs
//!
//! Defines the primary error type for the `digest` service.

use crate::config::ConfigError;
use book_digest_core::ports::GenerationError;

/// The primary error type for the `digest` service.
#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A validation error surfaced by one of the core generation operations.
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Represents a standard Input/Output error (e.g., reading the reading-list file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Represents a serialization error while reading input or emitting the digest.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
