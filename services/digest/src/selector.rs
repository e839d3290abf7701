//! services/digest/src/selector.rs
//!
//! Startup-time provider resolution. Binds one content service as primary
//! and one as fallback-provider by configured name. Resolution is pure
//! configuration lookup and cannot fail; unrecognized names silently
//! default rather than erroring.

use std::sync::Arc;

use book_digest_core::ports::ContentGeneration;
use book_digest_core::service::ContentService;

use crate::adapters::gemini::GeminiClient;
use crate::adapters::groq::GroqClient;
use crate::config::Config;

/// The provider bindings for the process lifetime. The orchestrator only
/// calls the primary; the fallback binding is kept for dual-provider
/// fallback chains.
pub struct ResolvedProviders {
    pub primary: Arc<dyn ContentGeneration>,
    pub fallback: Arc<dyn ContentGeneration>,
}

/// Resolves provider bindings from configuration, once at startup.
pub fn resolve(config: &Config) -> ResolvedProviders {
    let primary: Arc<dyn ContentGeneration> = match config.default_provider.as_str() {
        "gemini" => Arc::new(ContentService::new(GeminiClient::new(
            config.gemini.clone(),
        ))),
        // "groq" and anything unrecognized.
        _ => Arc::new(ContentService::new(GroqClient::new(config.groq.clone()))),
    };

    let fallback: Arc<dyn ContentGeneration> = match config.fallback_provider.as_str() {
        "groq" => Arc::new(ContentService::new(GroqClient::new(config.groq.clone()))),
        _ => Arc::new(ContentService::new(GeminiClient::new(
            config.gemini.clone(),
        ))),
    };

    tracing::info!(
        configured_primary = %config.default_provider,
        primary = %primary.provider_name(),
        primary_available = primary.is_available(),
        configured_fallback = %config.fallback_provider,
        fallback = %fallback.provider_name(),
        "resolved AI providers"
    );

    ResolvedProviders { primary, fallback }
}
