//! Model-backed question generation and answer evaluation
//!
//! The [`QuizClient`] translates user configuration into model requests,
//! enforces response shape, and applies the primary/fallback model
//! protocol for generation. The [`ModelBackend`] trait is the provider
//! seam: production code uses [`GeminiBackend`], tests substitute mocks.

pub mod backend;
pub mod evaluate;
pub mod generate;
pub mod gemini;
mod prompts;

pub use backend::{
    BackendError, BackendResult, ModelBackend, ModelRequest, ModelResponse, RequestPart,
};
pub use evaluate::EvaluationError;
pub use gemini::GeminiBackend;
pub use generate::{GenerationError, GenerationRequest};

use std::sync::Arc;

use crate::config::Config;

/// Client for question generation and answer grading.
///
/// Stateless between calls: concurrent invocations share nothing beyond
/// the backend's HTTP connection pool, so there is no ordering guarantee
/// and no mutual exclusion between them. No timeout is enforced here;
/// that is the transport's or the caller's concern.
pub struct QuizClient {
    backend: Arc<dyn ModelBackend>,
    primary_model: String,
    fallback_model: String,
    evaluation_model: String,
    max_source_chars: usize,
}

impl QuizClient {
    /// Build a client over an explicit backend
    pub fn new(backend: Arc<dyn ModelBackend>, config: &Config) -> Self {
        Self {
            backend,
            primary_model: config.models.primary.clone(),
            fallback_model: config.models.fallback.clone(),
            evaluation_model: config.models.evaluation.clone(),
            max_source_chars: config.generation.max_source_chars,
        }
    }

    /// Build a client backed by the live Gemini API.
    ///
    /// The API key is demanded here, before any network call; a missing
    /// key fails with a configuration error.
    pub fn from_env(config: &Config) -> BackendResult<Self> {
        let backend = GeminiBackend::from_env()?;
        Ok(Self::new(Arc::new(backend), config))
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }
}
