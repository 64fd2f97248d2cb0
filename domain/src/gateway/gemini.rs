//! Gemini API client for text generation and audio transcription.
//!
//! This module provides an HTTP client for the `generateContent` endpoint of a
//! Gemini-style API. Audio for transcription is inlined into the request body
//! as base64 rather than uploaded separately.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind, InternalErrorKind};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use log::*;
use serde::{Deserialize, Serialize};
use service::config::Config;

/// A `generateContent` request body.
#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// A single request part: either plain text or inline binary data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Base64-encoded payload
    pub data: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate. An empty candidate list or a
    /// candidate without text parts yields an empty string, never an error.
    pub fn first_candidate_text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

/// Gemini API client
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    transcription_model: String,
    text_model: String,
}

impl GeminiClient {
    /// Create a new Gemini client with the given API key and base URL
    pub fn new(
        api_key: &str,
        base_url: &str,
        transcription_model: &str,
        text_model: &str,
    ) -> Result<Self, Error> {
        let mut headers = reqwest::header::HeaderMap::new();

        let mut header_value = reqwest::header::HeaderValue::from_str(api_key).map_err(|e| {
            warn!("Failed to create auth header: {:?}", e);
            Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                    "Invalid API key format".to_string(),
                )),
            }
        })?;
        header_value.set_sensitive(true);
        headers.insert("x-goog-api-key", header_value);

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            transcription_model: transcription_model.to_string(),
            text_model: text_model.to_string(),
        })
    }

    /// Build a client from runtime config. A missing API key is a configuration
    /// error; callers that degrade on it must catch `InternalErrorKind::Config`.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let api_key = config.google_api_key().ok_or_else(|| {
            warn!("GOOGLE_API_KEY is not configured");
            Error {
                source: None,
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
            }
        })?;

        Self::new(
            &api_key,
            config.gemini_base_url(),
            config.gemini_transcription_model(),
            config.gemini_text_model(),
        )
    }

    /// Generate text from a prompt using the configured text model
    pub async fn generate(&self, prompt: &str) -> Result<String, Error> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                    inline_data: None,
                }],
            }],
        };

        self.generate_content(&self.text_model, request).await
    }

    /// Transcribe audio bytes using the configured transcription model.
    /// The instruction tells the model how to transcribe (language, formatting).
    pub async fn transcribe(
        &self,
        audio: &[u8],
        mime_type: &str,
        instruction: &str,
    ) -> Result<String, Error> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: Some(instruction.to_string()),
                        inline_data: None,
                    },
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: mime_type.to_string(),
                            data: BASE64.encode(audio),
                        }),
                    },
                ],
            }],
        };

        self.generate_content(&self.transcription_model, request)
            .await
    }

    async fn generate_content(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> Result<String, Error> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        debug!("Calling Gemini model: {}", model);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to reach Gemini API: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
                }
            })?;

        if response.status().is_success() {
            let body: GenerateContentResponse = response.json().await.map_err(|e| {
                warn!("Failed to parse Gemini response: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                        "Invalid response from Gemini".to_string(),
                    )),
                }
            })?;
            Ok(body.first_candidate_text())
        } else {
            let error_text = response.text().await.unwrap_or_default();
            error!("Gemini API: {}", error_text);
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Upstream(error_text)),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> GeminiClient {
        GeminiClient::new("test-key", base_url, "transcribe-model", "text-model").unwrap()
    }

    #[tokio::test]
    async fn generate_returns_first_candidate_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/text-model:generateContent")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"candidates":[{"content":{"parts":[{"text":"A dark"},{"text":" cave"}]}}]}"#,
            )
            .create_async()
            .await;

        let client = test_client(&server.url());
        let text = client.generate("describe the cave").await.unwrap();

        assert_eq!(text, "A dark cave");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn generate_defaults_to_empty_string_when_no_candidates() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/text-model:generateContent")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let text = client.generate("anything").await.unwrap();

        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn non_success_status_maps_to_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/text-model:generateContent")
            .with_status(429)
            .with_body("quota exceeded")
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client.generate("anything").await.unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::Upstream("quota exceeded".to_string()))
        );
    }

    #[tokio::test]
    async fn transcribe_posts_to_transcription_model() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/transcribe-model:generateContent")
            .match_body(mockito::Matcher::PartialJsonString(
                // "abc" base64-encoded
                r#"{"contents":[{"parts":[{"text":"transcribe"},{"inlineData":{"mimeType":"audio/wav","data":"YWJj"}}]}]}"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"hello"}]}}]}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let text = client
            .transcribe(b"abc", "audio/wav", "transcribe")
            .await
            .unwrap();

        assert_eq!(text, "hello");
        mock.assert_async().await;
    }
}
