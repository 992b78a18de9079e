//! Prompt templates and response schemas for generation and evaluation

use serde_json::json;

use crate::question::QuestionKind;

use super::generate::GenerationRequest;

/// Truncate source text to at most `max_chars` characters, respecting
/// char boundaries
pub(crate) fn truncate_source(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Kind-specific instructions embedded in the generation prompt. These
/// change what the model is asked for, not the response schema.
fn kind_instructions(kind: QuestionKind) -> &'static str {
    match kind {
        QuestionKind::Mcq => {
            "Each question must have exactly 4 options with exactly one correct answer. \
             Set \"correct_answer\" to the full text of the correct option. \
             Leave \"model_answer\" and \"context_passage\" empty."
        }
        QuestionKind::FillBlanks => {
            "Each question must be a sentence containing the literal marker _____ where \
             the missing text belongs. Set \"correct_answer\" to the missing text. \
             Do not provide options. Leave \"model_answer\" and \"context_passage\" empty."
        }
        QuestionKind::VeryShort => {
            "Each question must be answerable in one or two sentences. Provide a \
             non-empty \"model_answer\" written in your own words rather than copied \
             from the source. Leave \"options\" and \"correct_answer\" empty."
        }
        QuestionKind::Short => {
            "Each question must require a focused answer of a few sentences. Provide a \
             non-empty \"model_answer\" written in your own words rather than copied \
             from the source. Leave \"options\" and \"correct_answer\" empty."
        }
        QuestionKind::Long => {
            "Each question must require a detailed, structured answer of several \
             paragraphs. Provide a non-empty \"model_answer\" written in your own words \
             rather than copied from the source. Leave \"options\" and \
             \"correct_answer\" empty."
        }
        QuestionKind::CaseBased => {
            "Each question must refer to a case study. Put a non-empty \
             \"context_passage\" drawn from the source material in every question, and \
             provide a non-empty \"model_answer\" written in your own words. Leave \
             \"options\" and \"correct_answer\" empty."
        }
        QuestionKind::ExtractBased => {
            "Each question must refer to an extract from the source. Put the extract in \
             a non-empty \"context_passage\" in every question, and provide a non-empty \
             \"model_answer\" written in your own words. Leave \"options\" and \
             \"correct_answer\" empty."
        }
    }
}

/// Build the full generation prompt. Source text is truncated to
/// `max_source_chars` before being embedded.
pub(crate) fn generation_prompt(request: &GenerationRequest, max_source_chars: usize) -> String {
    let source = truncate_source(&request.source_text, max_source_chars);
    let exam_context = if request.exam_context.is_empty() {
        "a general knowledge examination"
    } else {
        request.exam_context.as_str()
    };

    format!(
        "You are an experienced examiner preparing questions for {exam_context}.\n\
         \n\
         Generate exactly {count} {kind} questions of {difficulty} difficulty from the \
         source material below.\n\
         \n\
         Requirements:\n\
         1. Every question must be answerable from the source material alone.\n\
         2. {kind_rules}\n\
         3. Include a brief \"explanation\" of the answer for every question.\n\
         4. Respond with a JSON object containing a \"questions\" array and nothing else.\n\
         \n\
         Source material:\n\
         {source}",
        exam_context = exam_context,
        count = request.question_count,
        kind = request.kind.display_name(),
        difficulty = request.difficulty,
        kind_rules = kind_instructions(request.kind),
        source = source,
    )
}

/// Response schema for generation requests. Advisory: biases the model's
/// output shape but is re-validated on receipt.
pub(crate) fn generation_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "questions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "question": {"type": "STRING"},
                        "options": {"type": "ARRAY", "items": {"type": "STRING"}},
                        "correct_answer": {"type": "STRING"},
                        "model_answer": {"type": "STRING"},
                        "context_passage": {"type": "STRING"},
                        "explanation": {"type": "STRING"}
                    },
                    "required": ["question"]
                }
            }
        },
        "required": ["questions"]
    })
}

/// Build the grading prompt for one handwritten answer
pub(crate) fn evaluation_prompt(question: &str, model_answer: &str, max_marks: u32) -> String {
    format!(
        "You are grading a student's handwritten answer, shown in the attached image.\n\
         \n\
         Question: {question}\n\
         \n\
         Reference answer: {model_answer}\n\
         \n\
         Grade the student's answer out of {max_marks} marks. Award partial credit for \
         partially correct answers. If the image is unreadable or does not contain an \
         answer to this question, give a score of 0 and say so in the feedback.\n\
         \n\
         Respond with a JSON object with these fields and nothing else:\n\
         - \"score\": marks awarded, between 0 and {max_marks}\n\
         - \"maxMarks\": {max_marks}\n\
         - \"mistakes\": an array of short descriptions of mistakes, most important first\n\
         - \"feedback\": two or three sentences of constructive feedback",
        question = question,
        model_answer = model_answer,
        max_marks = max_marks,
    )
}

/// Response schema for evaluation requests
pub(crate) fn evaluation_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": {"type": "NUMBER"},
            "maxMarks": {"type": "NUMBER"},
            "mistakes": {"type": "ARRAY", "items": {"type": "STRING"}},
            "feedback": {"type": "STRING"}
        },
        "required": ["score", "maxMarks", "mistakes", "feedback"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_source("hello", 30_000), "hello");
    }

    #[test]
    fn test_truncate_bounds_length() {
        let long = "a".repeat(35_000);
        assert_eq!(truncate_source(&long, 30_000).len(), 30_000);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        // Multibyte chars: counting bytes would split the last one
        let text = "é".repeat(10);
        let truncated = truncate_source(&text, 5);
        assert_eq!(truncated.chars().count(), 5);
        assert_eq!(truncated, "ééééé");
    }

    #[test]
    fn test_fill_blanks_prompt_mentions_marker() {
        assert!(kind_instructions(QuestionKind::FillBlanks).contains("_____"));
    }

    #[test]
    fn test_context_kinds_require_passage() {
        assert!(kind_instructions(QuestionKind::CaseBased).contains("context_passage"));
        assert!(kind_instructions(QuestionKind::ExtractBased).contains("context_passage"));
    }

    #[test]
    fn test_empty_exam_context_uses_generic_default() {
        let request = GenerationRequest::new("source", 3, QuestionKind::Mcq);
        let prompt = generation_prompt(&request, 30_000);
        assert!(prompt.contains("a general knowledge examination"));
    }

    #[test]
    fn test_exam_context_steers_prompt() {
        let request = GenerationRequest::new("source", 3, QuestionKind::Mcq)
            .with_exam_context("CBSE class 10 board exam");
        let prompt = generation_prompt(&request, 30_000);
        assert!(prompt.contains("CBSE class 10 board exam"));
    }
}
