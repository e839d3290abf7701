//! services/digest/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables once at startup
//! and is immutable for the process lifetime. The `.env` file is used for
//! local development. API keys are optional on purpose: a missing or
//! placeholder key puts the provider on the fallback path instead of
//! failing startup.

use std::str::FromStr;

use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Connection and generation settings for one AI provider.
#[derive(Clone, Debug)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_tokens: u32,
    pub temperature: f32,
    pub enabled: bool,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub log_level: Level,
    pub groq: ProviderSettings,
    pub gemini: ProviderSettings,
    /// Name of the provider bound as primary; unrecognized names default.
    pub default_provider: String,
    /// Name of the provider kept as the fallback binding.
    pub fallback_provider: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let groq = ProviderSettings {
            api_key: std::env::var("GROQ_API_KEY").ok(),
            base_url: env_or("GROQ_BASE_URL", "https://api.groq.com/openai/v1"),
            model: env_or("GROQ_MODEL", "llama-3.3-70b-versatile"),
            timeout_secs: parse_env("GROQ_TIMEOUT", 30)?,
            max_tokens: parse_env("GROQ_MAX_TOKENS", 1000)?,
            temperature: parse_env("GROQ_TEMPERATURE", 0.7)?,
            enabled: parse_env("GROQ_ENABLED", true)?,
        };

        let gemini = ProviderSettings {
            api_key: std::env::var("GEMINI_API_KEY").ok(),
            base_url: env_or(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com/v1beta",
            ),
            model: env_or("GEMINI_MODEL", "gemini-2.0-flash"),
            timeout_secs: parse_env("GEMINI_TIMEOUT", 30)?,
            max_tokens: parse_env("GEMINI_MAX_OUTPUT_TOKENS", 500)?,
            temperature: parse_env("GEMINI_TEMPERATURE", 0.7)?,
            enabled: parse_env("GEMINI_ENABLED", true)?,
        };

        Ok(Self {
            log_level,
            groq,
            gemini,
            default_provider: env_or("AI_DEFAULT_PROVIDER", "groq"),
            fallback_provider: env_or("AI_FALLBACK_PROVIDER", "gemini"),
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue(name.to_string(), raw)),
        Err(_) => Ok(default),
    }
}
