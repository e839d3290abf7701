//! services/digest/src/adapters/mod.rs
//!
//! Provider transport adapters. Each implements the `ProviderClient` port
//! from the core crate for one upstream text-generation API.

pub mod gemini;
pub mod groq;

/// A key is usable when it is present, non-empty, and not the documented
/// placeholder value.
pub(crate) fn key_is_usable(api_key: Option<&str>, placeholder: &str) -> bool {
    matches!(api_key, Some(key) if !key.is_empty() && key != placeholder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_and_empty_keys_are_unusable() {
        assert!(!key_is_usable(None, "your-key-here"));
        assert!(!key_is_usable(Some(""), "your-key-here"));
        assert!(!key_is_usable(Some("your-key-here"), "your-key-here"));
        assert!(key_is_usable(Some("sk-real"), "your-key-here"));
    }
}
