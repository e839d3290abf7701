//! services/digest/src/adapters/groq.rs
//!
//! Transport adapter for Groq's OpenAI-compatible chat-completions API.
//! It implements the `ProviderClient` port from the core crate.

use std::time::Duration;

use async_trait::async_trait;
use book_digest_core::ports::{GenerationParams, ProviderClient, ProviderFailure};
use serde::{Deserialize, Serialize};

use crate::adapters::key_is_usable;
use crate::config::ProviderSettings;

const PLACEHOLDER_KEY: &str = "your-groq-api-key-here";

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that invokes Groq chat completions over HTTP.
#[derive(Clone)]
pub struct GroqClient {
    http: reqwest::Client,
    settings: ProviderSettings,
}

impl GroqClient {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }
}

//=========================================================================================
// `ProviderClient` Trait Implementation
//=========================================================================================

#[async_trait]
impl ProviderClient for GroqClient {
    async fn invoke(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<String, ProviderFailure> {
        let url = format!("{}/chat/completions", self.settings.base_url);
        let body = ChatRequest {
            model: &self.settings.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: params.temperature.unwrap_or(self.settings.temperature),
            max_tokens: params.max_tokens.unwrap_or(self.settings.max_tokens),
            top_p: 0.95,
            stream: false,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.settings.api_key.as_deref().unwrap_or_default())
            .timeout(Duration::from_secs(self.settings.timeout_secs))
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderFailure::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderFailure::Http {
                status: status.as_u16(),
                body,
            });
        }

        let payload: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderFailure::MalformedPayload(e.to_string()))?;

        payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or(ProviderFailure::EmptyResponse)
    }

    fn is_available(&self) -> bool {
        self.settings.enabled && key_is_usable(self.settings.api_key.as_deref(), PLACEHOLDER_KEY)
    }

    fn provider_name(&self) -> &str {
        "groq"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn settings(base_url: String, api_key: Option<&str>) -> ProviderSettings {
        ProviderSettings {
            api_key: api_key.map(str::to_string),
            base_url,
            model: "llama-3.3-70b-versatile".to_string(),
            timeout_secs: 5,
            max_tokens: 1000,
            temperature: 0.7,
            enabled: true,
        }
    }

    #[tokio::test]
    async fn invoke_sends_chat_body_and_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "llama-3.3-70b-versatile",
                "messages": [{"role": "user", "content": "say something"}],
                "temperature": 0.7,
                "max_tokens": 1000,
                "top_p": 0.95,
                "stream": false,
            })))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"  a passage  "}}]}"#)
            .create_async()
            .await;

        let client = GroqClient::new(settings(server.url(), Some("test-key")));
        let text = client
            .invoke("say something", GenerationParams::defaults())
            .await
            .unwrap();

        mock.assert_async().await;
        // Raw text is returned untrimmed; trimming belongs to the caller.
        assert_eq!(text, "  a passage  ");
    }

    #[tokio::test]
    async fn explicit_params_override_configured_defaults() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "temperature": 0.3,
                "max_tokens": 500,
            })))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"ok"}}]}"#)
            .create_async()
            .await;

        let client = GroqClient::new(settings(server.url(), Some("test-key")));
        let params = GenerationParams {
            temperature: Some(0.3),
            max_tokens: Some(500),
        };
        client.invoke("p", params).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_reported_with_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let client = GroqClient::new(settings(server.url(), Some("test-key")));
        let err = client
            .invoke("p", GenerationParams::defaults())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ProviderFailure::Http {
                status: 429,
                body: "rate limited".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn missing_choice_content_is_empty_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let client = GroqClient::new(settings(server.url(), Some("test-key")));
        let err = client
            .invoke("p", GenerationParams::defaults())
            .await
            .unwrap_err();
        assert_eq!(err, ProviderFailure::EmptyResponse);
    }

    #[tokio::test]
    async fn undecodable_body_is_malformed_payload() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = GroqClient::new(settings(server.url(), Some("test-key")));
        let err = client
            .invoke("p", GenerationParams::defaults())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderFailure::MalformedPayload(_)));
    }

    #[test]
    fn availability_requires_a_real_key() {
        let base = "http://localhost".to_string();
        assert!(GroqClient::new(settings(base.clone(), Some("real"))).is_available());
        assert!(!GroqClient::new(settings(base.clone(), None)).is_available());
        assert!(!GroqClient::new(settings(base.clone(), Some(""))).is_available());
        assert!(!GroqClient::new(settings(base.clone(), Some(PLACEHOLDER_KEY))).is_available());

        let mut disabled = settings(base, Some("real"));
        disabled.enabled = false;
        assert!(!GroqClient::new(disabled).is_available());
    }
}
