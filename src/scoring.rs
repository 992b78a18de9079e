//! Local scoring for quiz attempts
//!
//! Objective answers are checked here by normalized comparison;
//! subjective answers contribute the score from their AI grading result.
//! Totals are always computed from the client-assigned marks.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::question::{EvaluationResult, QuestionKind, QuestionSpec};

/// What the user supplied for one question
#[derive(Debug, Clone)]
pub enum AnswerRecord {
    /// Free-text answer to an objective question
    Text(String),
    /// AI-graded result for a subjective question
    Evaluated(EvaluationResult),
    Skipped,
}

/// Outcome for a single question after scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum QuestionOutcome {
    Correct,
    Incorrect { expected: String },
    Graded { score: f64, clamped: bool },
    Skipped,
}

/// Totals for one completed attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptScore {
    pub outcomes: Vec<QuestionOutcome>,
    pub earned: f64,
    pub possible: u32,
}

impl AttemptScore {
    pub fn percent(&self) -> f64 {
        if self.possible == 0 {
            0.0
        } else {
            self.earned / self.possible as f64 * 100.0
        }
    }
}

/// Normalize free text for comparison: lowercase, punctuation stripped,
/// whitespace collapsed
pub fn normalize_answer(text: &str) -> String {
    let punctuation = Regex::new(r"[^\p{L}\p{N}\s]").unwrap();
    let lowercased = text.to_lowercase();
    let stripped = punctuation.replace_all(&lowercased, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Check an objective answer against the question's correct answer.
///
/// Multiple choice also accepts the 1-based option number.
pub fn check_objective(question: &QuestionSpec, answer: &str) -> bool {
    let normalized = normalize_answer(answer);
    if normalized.is_empty() {
        return false;
    }

    let expected = normalize_answer(&question.correct_answer);
    if !expected.is_empty() && normalized == expected {
        return true;
    }

    if question.kind == QuestionKind::Mcq {
        if let Ok(index) = answer.trim().parse::<usize>() {
            if index >= 1 {
                if let Some(option) = question.options.get(index - 1) {
                    return normalize_answer(option) == expected;
                }
            }
        }
    }

    false
}

/// Score a full attempt. `answers` is positional; questions past the end
/// of the slice count as skipped.
pub fn score_attempt(questions: &[QuestionSpec], answers: &[AnswerRecord]) -> AttemptScore {
    let mut outcomes = Vec::with_capacity(questions.len());
    let mut earned = 0.0;
    let mut possible = 0;

    for (i, question) in questions.iter().enumerate() {
        possible += question.marks;
        let outcome = match answers.get(i) {
            Some(AnswerRecord::Text(text)) if question.kind.is_objective() => {
                if check_objective(question, text) {
                    earned += question.marks as f64;
                    QuestionOutcome::Correct
                } else {
                    QuestionOutcome::Incorrect {
                        expected: question.correct_answer.clone(),
                    }
                }
            }
            Some(AnswerRecord::Evaluated(result)) => {
                earned += result.score;
                QuestionOutcome::Graded {
                    score: result.score,
                    clamped: result.clamped,
                }
            }
            // A bare text answer to a subjective question was never graded
            Some(AnswerRecord::Text(_)) | Some(AnswerRecord::Skipped) | None => {
                QuestionOutcome::Skipped
            }
        };
        outcomes.push(outcome);
    }

    AttemptScore {
        outcomes,
        earned,
        possible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mcq(correct: &str, options: &[&str]) -> QuestionSpec {
        QuestionSpec {
            kind: QuestionKind::Mcq,
            prompt: "Q".to_string(),
            context_passage: String::new(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_answer: correct.to_string(),
            model_answer: String::new(),
            explanation: String::new(),
            marks: 1,
        }
    }

    fn subjective(kind: QuestionKind) -> QuestionSpec {
        QuestionSpec {
            kind,
            prompt: "Q".to_string(),
            context_passage: String::new(),
            options: Vec::new(),
            correct_answer: String::new(),
            model_answer: "reference".to_string(),
            explanation: String::new(),
            marks: kind.marks(),
        }
    }

    #[test]
    fn test_normalize_answer() {
        assert_eq!(normalize_answer("  The Mitochondria!  "), "the mitochondria");
        assert_eq!(normalize_answer("co-operate,   now."), "cooperate now");
    }

    #[test]
    fn test_objective_match_ignores_case_and_punctuation() {
        let q = mcq("Paris", &["Paris", "Lyon", "Nice", "Metz"]);
        assert!(check_objective(&q, "paris"));
        assert!(check_objective(&q, " Paris. "));
        assert!(!check_objective(&q, "Lyon"));
        assert!(!check_objective(&q, ""));
    }

    #[test]
    fn test_mcq_accepts_option_number() {
        let q = mcq("Lyon", &["Paris", "Lyon", "Nice", "Metz"]);
        assert!(check_objective(&q, "2"));
        assert!(!check_objective(&q, "1"));
        assert!(!check_objective(&q, "5"));
        assert!(!check_objective(&q, "0"));
    }

    #[test]
    fn test_score_attempt_totals() {
        let questions = vec![
            mcq("Paris", &["Paris", "Lyon", "Nice", "Metz"]),
            subjective(QuestionKind::Short),
            mcq("Lyon", &["Paris", "Lyon", "Nice", "Metz"]),
        ];
        let answers = vec![
            AnswerRecord::Text("Paris".to_string()),
            AnswerRecord::Evaluated(EvaluationResult {
                score: 2.0,
                max_marks: 3,
                mistakes: Vec::new(),
                feedback: String::new(),
                clamped: false,
            }),
            AnswerRecord::Text("Nice".to_string()),
        ];

        let score = score_attempt(&questions, &answers);
        assert_eq!(score.possible, 5);
        assert_eq!(score.earned, 3.0);
        assert_eq!(score.outcomes.len(), 3);
        assert!(matches!(score.outcomes[0], QuestionOutcome::Correct));
        assert!(matches!(score.outcomes[1], QuestionOutcome::Graded { .. }));
        assert!(matches!(score.outcomes[2], QuestionOutcome::Incorrect { .. }));
        assert_eq!(score.percent(), 60.0);
    }

    #[test]
    fn test_missing_answers_count_as_skipped() {
        let questions = vec![mcq("a", &["a", "b"]), mcq("b", &["a", "b"])];
        let score = score_attempt(&questions, &[AnswerRecord::Text("a".to_string())]);
        assert!(matches!(score.outcomes[1], QuestionOutcome::Skipped));
        assert_eq!(score.earned, 1.0);
        assert_eq!(score.possible, 2);
    }

    #[test]
    fn test_ungraded_subjective_text_is_skipped() {
        let questions = vec![subjective(QuestionKind::Long)];
        let score = score_attempt(&questions, &[AnswerRecord::Text("essay".to_string())]);
        assert!(matches!(score.outcomes[0], QuestionOutcome::Skipped));
        assert_eq!(score.earned, 0.0);
    }

    #[test]
    fn test_empty_attempt_percent_is_zero() {
        let score = score_attempt(&[], &[]);
        assert_eq!(score.percent(), 0.0);
    }
}
