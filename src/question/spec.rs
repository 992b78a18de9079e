//! Generated question and grading result records

use serde::{Deserialize, Serialize};

use super::QuestionKind;

/// One generated quiz question with its grading metadata.
///
/// Instances are built by the generation client from a validated model
/// response and are never mutated afterwards. `marks` always comes from
/// [`QuestionKind::marks`], never from the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSpec {
    pub kind: QuestionKind,
    /// The question text shown to the user
    pub prompt: String,
    /// Supporting passage; empty unless the kind is case or extract based
    #[serde(default)]
    pub context_passage: String,
    /// Answer options; populated for multiple choice only (4 expected)
    #[serde(default)]
    pub options: Vec<String>,
    /// Exact-match answer for objective kinds, empty otherwise
    #[serde(default)]
    pub correct_answer: String,
    /// Reference answer for subjective kinds, empty otherwise
    #[serde(default)]
    pub model_answer: String,
    /// Advisory explanation of the answer
    #[serde(default)]
    pub explanation: String,
    pub marks: u32,
}

impl QuestionSpec {
    /// Reference text an evaluation call should grade against
    pub fn reference_answer(&self) -> &str {
        if self.kind.is_objective() {
            &self.correct_answer
        } else {
            &self.model_answer
        }
    }
}

/// Structured grading outcome for one subjective answer.
///
/// `max_marks` echoes the value the caller supplied, never the model's
/// echo of it. A score the model reported outside `0..=max_marks` is
/// coerced into range and `clamped` is set so callers can surface it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub score: f64,
    pub max_marks: u32,
    /// Short descriptions of mistakes found in the answer, in the order
    /// the grader listed them
    pub mistakes: Vec<String>,
    pub feedback: String,
    #[serde(default)]
    pub clamped: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_answer_by_kind() {
        let mcq = QuestionSpec {
            kind: QuestionKind::Mcq,
            prompt: "Pick one".to_string(),
            context_passage: String::new(),
            options: vec!["a".to_string(), "b".to_string()],
            correct_answer: "b".to_string(),
            model_answer: String::new(),
            explanation: String::new(),
            marks: 1,
        };
        assert_eq!(mcq.reference_answer(), "b");

        let short = QuestionSpec {
            kind: QuestionKind::Short,
            prompt: "Explain".to_string(),
            context_passage: String::new(),
            options: Vec::new(),
            correct_answer: String::new(),
            model_answer: "Because of X".to_string(),
            explanation: String::new(),
            marks: 3,
        };
        assert_eq!(short.reference_answer(), "Because of X");
    }

    #[test]
    fn test_spec_json_defaults() {
        let json = r#"{"kind":"short","prompt":"Explain photosynthesis","marks":3}"#;
        let spec: QuestionSpec = serde_json::from_str(json).unwrap();
        assert!(spec.options.is_empty());
        assert!(spec.correct_answer.is_empty());
        assert!(spec.explanation.is_empty());
    }
}
