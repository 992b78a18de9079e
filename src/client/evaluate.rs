//! Answer grading against a handwritten answer image

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;

use crate::question::EvaluationResult;

use super::backend::{ModelRequest, RequestPart};
use super::prompts;
use super::QuizClient;

/// Error types for answer evaluation
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("answer evaluation failed: {0}. Check your API credentials and connectivity, then retry.")]
    Model(String),

    #[error("invalid evaluation response: {0}. Check your API credentials and connectivity, then retry.")]
    InvalidResponse(String),
}

impl QuizClient {
    /// Grade one handwritten answer against a reference answer.
    ///
    /// Sends a single multimodal request to the evaluation model. Unlike
    /// generation there is no fallback tier; a failure here surfaces
    /// directly to the caller.
    pub async fn evaluate_answer(
        &self,
        question: &str,
        model_answer: &str,
        image: &[u8],
        image_mime_type: &str,
        max_marks: u32,
    ) -> Result<EvaluationResult, EvaluationError> {
        let prompt = prompts::evaluation_prompt(question, model_answer, max_marks);
        let model_request = ModelRequest::new(vec![
            RequestPart::inline_image(image_mime_type, BASE64.encode(image)),
            RequestPart::text(prompt),
        ])
        .with_schema(prompts::evaluation_schema());

        let response = self
            .backend
            .generate(&self.evaluation_model, &model_request)
            .await
            .map_err(|e| EvaluationError::Model(e.to_string()))?;

        parse_evaluation_response(&response.text, max_marks)
    }
}

/// Model-side grading payload. `maxMarks` must be present for the
/// response to be considered well formed, but the result always echoes
/// the caller's value instead.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvaluation {
    score: f64,
    #[allow(dead_code)]
    max_marks: f64,
    mistakes: Vec<String>,
    feedback: String,
}

/// Validate one raw grading response and coerce the score into range.
///
/// A score outside `0..=max_marks` is clamped and flagged rather than
/// propagated, so downstream totals can never exceed the marks table.
pub(crate) fn parse_evaluation_response(
    raw: &str,
    max_marks: u32,
) -> Result<EvaluationResult, EvaluationError> {
    let parsed: RawEvaluation =
        serde_json::from_str(raw).map_err(|e| EvaluationError::InvalidResponse(e.to_string()))?;

    let ceiling = max_marks as f64;
    let clamped = !(0.0..=ceiling).contains(&parsed.score);
    if clamped {
        tracing::warn!(
            "Model returned out-of-range score {} for max marks {}, clamping",
            parsed.score,
            max_marks
        );
    }

    Ok(EvaluationResult {
        score: parsed.score.clamp(0.0, ceiling),
        max_marks,
        mistakes: parsed.mistakes,
        feedback: parsed.feedback,
        clamped,
    })
}
