//! Backend trait definition for generative model access

use async_trait::async_trait;

/// One part of a model request: text or an inline image
#[derive(Debug, Clone)]
pub enum RequestPart {
    Text(String),
    InlineImage {
        mime_type: String,
        /// Base64-encoded image bytes
        data: String,
    },
}

impl RequestPart {
    pub fn text(content: impl Into<String>) -> Self {
        RequestPart::Text(content.into())
    }

    pub fn inline_image(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        RequestPart::InlineImage {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}

/// Request for structured content from a model backend
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub parts: Vec<RequestPart>,
    /// Schema sent with the request to bias the model's output shape.
    /// Advisory only: the far end does not enforce it, so callers must
    /// re-validate the response on receipt.
    pub response_schema: Option<serde_json::Value>,
    pub temperature: Option<f32>,
}

impl ModelRequest {
    pub fn new(parts: Vec<RequestPart>) -> Self {
        Self {
            parts,
            response_schema: None,
            temperature: None,
        }
    }

    pub fn with_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Concatenated text parts, used by tests to inspect what would be
    /// transmitted
    pub fn text_content(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                RequestPart::Text(t) => Some(t.as_str()),
                RequestPart::InlineImage { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Response from a model backend
#[derive(Debug, Clone)]
pub struct ModelResponse {
    /// Concatenated text output of the first candidate
    pub text: String,
    pub model: String,
    pub latency_ms: u64,
}

/// Error types for backend operations
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Trait for generative model backends
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Get the backend name (e.g., "gemini")
    fn name(&self) -> &str;

    /// Send one request to the named model and return its text output
    async fn generate(&self, model: &str, request: &ModelRequest) -> BackendResult<ModelResponse>;
}
