//! services/digest/src/adapters/gemini.rs
//!
//! Transport adapter for Google's Gemini generateContent API. It implements
//! the `ProviderClient` port from the core crate. Gemini authenticates with
//! a `key` query parameter rather than a bearer header, and can withhold all
//! candidates when its safety filter trips; that case is surfaced as a
//! distinct failure so the log line names the finish reason.

use std::time::Duration;

use async_trait::async_trait;
use book_digest_core::ports::{GenerationParams, ProviderClient, ProviderFailure};
use serde::{Deserialize, Serialize};

use crate::adapters::key_is_usable;
use crate::config::ProviderSettings;

const PLACEHOLDER_KEY: &str = "your-gemini-api-key-here";

const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";
const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
    #[serde(rename = "safetySettings")]
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "topK")]
    top_k: u32,
    #[serde(rename = "topP")]
    top_p: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    #[serde(rename = "stopSequences")]
    stop_sequences: Vec<String>,
}

#[derive(Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that invokes Gemini's generateContent endpoint over HTTP.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    settings: ProviderSettings,
}

impl GeminiClient {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }
}

fn extract_text(payload: GenerateResponse) -> Result<String, ProviderFailure> {
    let Some(candidate) = payload.candidates.into_iter().next() else {
        return Err(ProviderFailure::EmptyResponse);
    };

    let text = candidate
        .content
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text);

    match text {
        Some(text) => Ok(text),
        // A finish reason with no text means the safety filter ate the
        // candidate, e.g. SAFETY or RECITATION.
        None => match candidate.finish_reason {
            Some(reason) => {
                tracing::warn!(reason = %reason, "gemini withheld candidate text");
                Err(ProviderFailure::ContentFiltered { reason })
            }
            None => Err(ProviderFailure::EmptyResponse),
        },
    }
}

//=========================================================================================
// `ProviderClient` Trait Implementation
//=========================================================================================

#[async_trait]
impl ProviderClient for GeminiClient {
    async fn invoke(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<String, ProviderFailure> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.settings.base_url,
            self.settings.model,
            self.settings.api_key.as_deref().unwrap_or_default()
        );

        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: params.temperature.unwrap_or(self.settings.temperature),
                top_k: 40,
                top_p: 0.95,
                max_output_tokens: params.max_tokens.unwrap_or(self.settings.max_tokens),
                stop_sequences: Vec::new(),
            },
            safety_settings: HARM_CATEGORIES
                .into_iter()
                .map(|category| SafetySetting {
                    category,
                    threshold: SAFETY_THRESHOLD,
                })
                .collect(),
        };

        let response = self
            .http
            .post(&url)
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

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ProviderFailure::MalformedPayload(e.to_string()))?;

        extract_text(payload)
    }

    fn is_available(&self) -> bool {
        self.settings.enabled && key_is_usable(self.settings.api_key.as_deref(), PLACEHOLDER_KEY)
    }

    fn provider_name(&self) -> &str {
        "gemini"
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
            model: "gemini-2.0-flash".to_string(),
            timeout_secs: 5,
            max_tokens: 500,
            temperature: 0.7,
            enabled: true,
        }
    }

    #[tokio::test]
    async fn invoke_sends_generate_content_body_and_returns_first_part() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_body(Matcher::PartialJson(serde_json::json!({
                "contents": [{"parts": [{"text": "say something"}]}],
                "generationConfig": {
                    "temperature": 0.7,
                    "topK": 40,
                    "topP": 0.95,
                    "maxOutputTokens": 500,
                    "stopSequences": [],
                },
                "safetySettings": [
                    {"category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE"},
                    {"category": "HARM_CATEGORY_HATE_SPEECH", "threshold": "BLOCK_MEDIUM_AND_ABOVE"},
                    {"category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "threshold": "BLOCK_MEDIUM_AND_ABOVE"},
                    {"category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE"},
                ],
            })))
            .with_status(200)
            .with_body(
                r#"{"candidates":[{"content":{"parts":[{"text":"a passage"}]},"finishReason":"STOP"}]}"#,
            )
            .create_async()
            .await;

        let client = GeminiClient::new(settings(server.url(), Some("test-key")));
        let text = client
            .invoke("say something", GenerationParams::defaults())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(text, "a passage");
    }

    #[tokio::test]
    async fn filtered_candidate_reports_finish_reason() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#)
            .create_async()
            .await;

        let client = GeminiClient::new(settings(server.url(), Some("test-key")));
        let err = client
            .invoke("p", GenerationParams::defaults())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ProviderFailure::ContentFiltered {
                reason: "SAFETY".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn empty_candidate_list_is_empty_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let client = GeminiClient::new(settings(server.url(), Some("test-key")));
        let err = client
            .invoke("p", GenerationParams::defaults())
            .await
            .unwrap_err();
        assert_eq!(err, ProviderFailure::EmptyResponse);
    }

    #[tokio::test]
    async fn non_success_status_is_reported_with_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body("bad request")
            .create_async()
            .await;

        let client = GeminiClient::new(settings(server.url(), Some("test-key")));
        let err = client
            .invoke("p", GenerationParams::defaults())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ProviderFailure::Http {
                status: 400,
                body: "bad request".to_string(),
            }
        );
    }

    #[test]
    fn availability_requires_a_real_key() {
        let base = "http://localhost".to_string();
        assert!(GeminiClient::new(settings(base.clone(), Some("real"))).is_available());
        assert!(!GeminiClient::new(settings(base.clone(), None)).is_available());
        assert!(!GeminiClient::new(settings(base, Some(PLACEHOLDER_KEY))).is_available());
    }
}
