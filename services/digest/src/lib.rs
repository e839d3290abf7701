//! services/digest/src/lib.rs
//!
//! The digest service: HTTP adapters for the Groq and Gemini providers,
//! environment configuration, and startup provider resolution. The CLI
//! binary composes these with the orchestrator from `book_digest_core`.

pub mod adapters;
pub mod config;
pub mod error;
pub mod selector;
