//! crates/book_digest_core/src/lib.rs
//!
//! The AI content-generation core of Book Digest: prompt construction,
//! response parsing, fallback content, the per-provider content service,
//! and the daily digest orchestrator. Provider transports and configuration
//! live behind the ports defined here and are supplied by the service crate.

pub mod digest;
pub mod domain;
pub mod fallback;
pub mod parser;
pub mod ports;
pub mod prompt;
pub mod service;
