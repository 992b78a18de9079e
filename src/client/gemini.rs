//! Google Gemini API client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::backend::{
    BackendError, BackendResult, ModelBackend, ModelRequest, ModelResponse, RequestPart,
};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variables probed for the API key, in order
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Gemini `generateContent` API client
#[derive(Debug)]
pub struct GeminiBackend {
    api_key: String,
    base_url: String,
    http_client: Client,
}

impl GeminiBackend {
    /// Create a new Gemini client with an explicit API key
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: BASE_URL.to_string(),
            http_client: Client::new(),
        }
    }

    /// Create from the conventional environment variables.
    ///
    /// Fails before any network traffic when no key is present.
    pub fn from_env() -> BackendResult<Self> {
        let api_key = API_KEY_ENV_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok())
            .ok_or_else(|| {
                BackendError::Config(format!(
                    "no API key found; set {} or {}",
                    API_KEY_ENV_VARS[0], API_KEY_ENV_VARS[1]
                ))
            })?;
        Ok(Self::new(api_key))
    }

    /// Set custom base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum GeminiPart {
    Text { text: String },
    Inline { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
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

#[derive(Deserialize)]
struct GeminiError {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
    #[allow(dead_code)]
    code: Option<i64>,
}

impl From<&RequestPart> for GeminiPart {
    fn from(part: &RequestPart) -> Self {
        match part {
            RequestPart::Text(text) => GeminiPart::Text { text: text.clone() },
            RequestPart::InlineImage { mime_type, data } => GeminiPart::Inline {
                inline_data: InlineData {
                    mime_type: mime_type.clone(),
                    data: data.clone(),
                },
            },
        }
    }
}

#[async_trait]
impl ModelBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, model: &str, request: &ModelRequest) -> BackendResult<ModelResponse> {
        let start = Instant::now();

        let parts: Vec<GeminiPart> = request.parts.iter().map(|p| p.into()).collect();

        // A schema implies a JSON response; without one the model returns
        // plain text
        let generation_config = if request.response_schema.is_some() || request.temperature.is_some()
        {
            Some(GenerationConfig {
                response_mime_type: request
                    .response_schema
                    .as_ref()
                    .map(|_| "application/json".to_string()),
                response_schema: request.response_schema.clone(),
                temperature: request.temperature,
            })
        } else {
            None
        };

        let body = GeminiRequest {
            contents: vec![GeminiContent { parts }],
            generation_config,
        };

        let response = self
            .http_client
            .post(format!("{}/models/{}:generateContent", self.base_url, model))
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let latency_ms = start.elapsed().as_millis() as u64;
        let status = response.status();

        if !status.is_success() {
            let error: GeminiError = response
                .json()
                .await
                .map_err(|e| BackendError::Parse(e.to_string()))?;
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: error.error.message,
            });
        }

        let api_response: GeminiResponse = response.json().await?;

        let candidate = api_response
            .candidates
            .first()
            .ok_or_else(|| BackendError::Parse("no candidates in response".to_string()))?;

        let text = candidate
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.clone())
            .collect::<Vec<_>>()
            .join("");

        Ok(ModelResponse {
            text,
            model: model.to_string(),
            latency_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization_text_only() {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart::Text {
                    text: "hello".to_string(),
                }],
            }],
            generation_config: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert!(json.get("generation_config").is_none());
    }

    #[test]
    fn test_request_serialization_inline_image() {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart::Inline {
                    inline_data: InlineData {
                        mime_type: "image/png".to_string(),
                        data: "aGVsbG8=".to_string(),
                    },
                }],
            }],
            generation_config: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json["contents"][0]["parts"][0]["inline_data"]["mime_type"],
            "image/png"
        );
    }

    #[test]
    fn test_error_body_parses() {
        let raw = r#"{"error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}}"#;
        let parsed: GeminiError = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.error.message, "Resource has been exhausted");
    }

    #[test]
    fn test_response_text_extraction() {
        let raw = r#"{"candidates": [{"content": {"parts": [{"text": "first"}, {"text": " second"}], "role": "model"}, "finishReason": "STOP"}]}"#;
        let parsed: GeminiResponse = serde_json::from_str(raw).unwrap();
        let text: String = parsed.candidates[0]
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.clone())
            .collect();
        assert_eq!(text, "first second");
    }
}
