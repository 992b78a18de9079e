//! Question generation with the primary/fallback model protocol

use crate::question::{QuestionKind, QuestionSpec};

use super::backend::{ModelRequest, RequestPart};
use super::prompts;
use super::QuizClient;

/// Parameters for one generation call. Ephemeral: built per call and
/// never persisted.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub source_text: String,
    pub question_count: u32,
    pub difficulty: String,
    pub kind: QuestionKind,
    /// Free text used to steer tone and style; empty means a generic
    /// default
    pub exam_context: String,
}

impl GenerationRequest {
    pub fn new(source_text: impl Into<String>, question_count: u32, kind: QuestionKind) -> Self {
        Self {
            source_text: source_text.into(),
            question_count,
            difficulty: "medium".to_string(),
            kind,
            exam_context: String::new(),
        }
    }

    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = difficulty.into();
        self
    }

    pub fn with_exam_context(mut self, exam_context: impl Into<String>) -> Self {
        self.exam_context = exam_context.into();
        self
    }
}

/// Error types for question generation
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("question count must be at least 1")]
    InvalidCount,

    #[error("invalid response format")]
    InvalidFormat,

    #[error("question generation failed: {0}")]
    Model(String),
}

impl QuizClient {
    /// Generate a batch of questions from source text.
    ///
    /// The request goes to the primary model first. Any failure there,
    /// from transport errors to a malformed response, is logged and the
    /// whole unmodified request is retried once against the fallback
    /// model. Two attempts total, no backoff. Either a fully validated
    /// batch comes back or the call fails; partial results are never
    /// returned.
    pub async fn generate_questions(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<QuestionSpec>, GenerationError> {
        if request.question_count == 0 {
            return Err(GenerationError::InvalidCount);
        }

        let prompt = prompts::generation_prompt(request, self.max_source_chars);
        let model_request = ModelRequest::new(vec![RequestPart::text(prompt)])
            .with_schema(prompts::generation_schema());

        match self.attempt(&self.primary_model, &model_request, request.kind).await {
            Ok(questions) => Ok(questions),
            Err(primary_err) => {
                tracing::warn!(
                    "Generation with {} failed ({}), retrying with {}",
                    self.primary_model,
                    primary_err,
                    self.fallback_model
                );
                // The fallback attempt's diagnostic supersedes the
                // primary's, which survives only in the log above
                self.attempt(&self.fallback_model, &model_request, request.kind)
                    .await
            }
        }
    }

    async fn attempt(
        &self,
        model: &str,
        model_request: &ModelRequest,
        kind: QuestionKind,
    ) -> Result<Vec<QuestionSpec>, GenerationError> {
        let response = self
            .backend
            .generate(model, model_request)
            .await
            .map_err(|e| GenerationError::Model(e.to_string()))?;
        parse_generation_response(&response.text, kind)
    }
}

/// Validate and remap one raw model response into question records.
///
/// The response must be JSON with a `questions` array; anything else is
/// an invalid format. Each element is remapped field by field rather than
/// deserialized directly: the requested kind overwrites whatever the
/// model claimed, absent or null fields become empty, and marks come
/// from the fixed per-kind table.
pub(crate) fn parse_generation_response(
    raw: &str,
    kind: QuestionKind,
) -> Result<Vec<QuestionSpec>, GenerationError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|_| GenerationError::InvalidFormat)?;

    let items = value
        .get("questions")
        .and_then(|q| q.as_array())
        .ok_or(GenerationError::InvalidFormat)?;

    Ok(items.iter().map(|item| map_question(item, kind)).collect())
}

fn map_question(item: &serde_json::Value, kind: QuestionKind) -> QuestionSpec {
    let options = item
        .get("options")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|o| o.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    QuestionSpec {
        kind,
        prompt: string_field(item, "question"),
        context_passage: string_field(item, "context_passage"),
        options,
        correct_answer: string_field(item, "correct_answer"),
        model_answer: string_field(item, "model_answer"),
        explanation: string_field(item, "explanation"),
        marks: kind.marks(),
    }
}

fn string_field(item: &serde_json::Value, key: &str) -> String {
    item.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_mcq() {
        let raw = r#"{"questions": [
            {"question": "What is 2+2?",
             "options": ["3", "4", "5", "6"],
             "correct_answer": "4",
             "explanation": "Basic arithmetic"}
        ]}"#;
        let questions = parse_generation_response(raw, QuestionKind::Mcq).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].options.len(), 4);
        assert_eq!(questions[0].correct_answer, "4");
        assert_eq!(questions[0].marks, 1);
    }

    #[test]
    fn test_requested_kind_overrides_model_claim() {
        let raw = r#"{"questions": [{"question": "Q", "kind": "long", "type": "essay"}]}"#;
        let questions = parse_generation_response(raw, QuestionKind::Mcq).unwrap();
        assert_eq!(questions[0].kind, QuestionKind::Mcq);
        assert_eq!(questions[0].marks, 1);
    }

    #[test]
    fn test_absent_fields_default_to_empty() {
        let raw = r#"{"questions": [{"question": "Q"}]}"#;
        let questions = parse_generation_response(raw, QuestionKind::Short).unwrap();
        let q = &questions[0];
        assert!(q.options.is_empty());
        assert!(q.correct_answer.is_empty());
        assert!(q.model_answer.is_empty());
        assert!(q.context_passage.is_empty());
        assert!(q.explanation.is_empty());
        assert_eq!(q.marks, 3);
    }

    #[test]
    fn test_null_fields_default_to_empty() {
        let raw = r#"{"questions": [{"question": "Q", "correct_answer": null, "options": null}]}"#;
        let questions = parse_generation_response(raw, QuestionKind::FillBlanks).unwrap();
        assert!(questions[0].correct_answer.is_empty());
        assert!(questions[0].options.is_empty());
    }

    #[test]
    fn test_missing_questions_array_is_invalid_format() {
        let err = parse_generation_response(r#"{"items": []}"#, QuestionKind::Mcq).unwrap_err();
        assert_eq!(err.to_string(), "invalid response format");
    }

    #[test]
    fn test_non_json_is_invalid_format() {
        let err =
            parse_generation_response("Sorry, I can't do that.", QuestionKind::Mcq).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidFormat));
    }

    #[test]
    fn test_questions_not_an_array_is_invalid_format() {
        let err = parse_generation_response(r#"{"questions": "none"}"#, QuestionKind::Mcq)
            .unwrap_err();
        assert!(matches!(err, GenerationError::InvalidFormat));
    }
}
