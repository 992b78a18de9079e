//! Application state machine for a quiz run
//!
//! State flows one way through `Setup -> Loading -> Quiz -> Results`,
//! with `Browse` as a side state for the library. All progress lives in
//! the state value; transitions happen only through [`AppState::apply`],
//! and illegal ones are errors rather than panics.

use crate::question::{QuestionKind, QuestionSpec};
use crate::scoring::{score_attempt, AnswerRecord, AttemptScore};

/// Illegal state/event combination
#[derive(Debug, thiserror::Error)]
#[error("event {event} is not valid in state {state}")]
pub struct TransitionError {
    pub state: &'static str,
    pub event: &'static str,
}

/// Configuration collected before generation starts
#[derive(Debug, Clone, Default)]
pub struct SetupForm {
    pub source_path: String,
    pub question_count: u32,
    pub difficulty: String,
    pub kind: Option<QuestionKind>,
    pub exam_context: String,
}

/// Live progress through one quiz attempt.
///
/// Questions are never mutated; answers are recorded positionally and
/// the cursor only moves forward.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<QuestionSpec>,
    answers: Vec<AnswerRecord>,
    cursor: usize,
}

impl QuizSession {
    pub fn new(questions: Vec<QuestionSpec>) -> Self {
        Self {
            questions,
            answers: Vec::new(),
            cursor: 0,
        }
    }

    /// The question awaiting an answer, if any
    pub fn current(&self) -> Option<&QuestionSpec> {
        self.questions.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn questions(&self) -> &[QuestionSpec] {
        &self.questions
    }

    pub fn answered(&self, index: usize) -> bool {
        matches!(
            self.answers.get(index),
            Some(AnswerRecord::Text(_)) | Some(AnswerRecord::Evaluated(_))
        )
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.questions.len()
    }

    fn record(&mut self, answer: AnswerRecord) {
        self.answers.push(answer);
        self.cursor += 1;
    }

    fn into_score(self) -> AttemptScore {
        score_attempt(&self.questions, &self.answers)
    }
}

/// The application states, in unidirectional flow order
pub enum AppState {
    Setup(SetupForm),
    Loading,
    Quiz(QuizSession),
    Results(AttemptScore),
    Browse,
}

/// Events that drive state transitions
pub enum Event {
    /// Setup complete, generation starting
    Start,
    /// Generation produced a batch of questions
    QuestionsReady(Vec<QuestionSpec>),
    /// Generation failed; back to setup
    LoadFailed,
    /// Record an answer for the current question and advance
    Answer(AnswerRecord),
    /// End the attempt and compute the score
    Finish,
    /// Open the saved quiz library
    BrowseLibrary,
    /// Leave the library
    Back,
    /// Start over from setup
    Restart,
}

impl AppState {
    pub fn name(&self) -> &'static str {
        match self {
            AppState::Setup(_) => "setup",
            AppState::Loading => "loading",
            AppState::Quiz(_) => "quiz",
            AppState::Results(_) => "results",
            AppState::Browse => "browse",
        }
    }

    /// Apply one event. On an illegal combination the state is left
    /// unchanged and an error is returned.
    pub fn apply(&mut self, event: Event) -> Result<(), TransitionError> {
        let state = std::mem::replace(self, AppState::Loading);
        match (state, event) {
            (AppState::Setup(_), Event::Start) => {
                *self = AppState::Loading;
                Ok(())
            }
            (AppState::Setup(_), Event::BrowseLibrary) => {
                *self = AppState::Browse;
                Ok(())
            }
            (AppState::Browse, Event::Back) => {
                *self = AppState::Setup(SetupForm::default());
                Ok(())
            }
            (AppState::Loading, Event::QuestionsReady(questions)) => {
                *self = AppState::Quiz(QuizSession::new(questions));
                Ok(())
            }
            (AppState::Loading, Event::LoadFailed) => {
                *self = AppState::Setup(SetupForm::default());
                Ok(())
            }
            (AppState::Quiz(mut session), Event::Answer(answer)) => {
                if session.is_complete() {
                    let err = TransitionError {
                        state: "quiz",
                        event: "answer",
                    };
                    *self = AppState::Quiz(session);
                    return Err(err);
                }
                session.record(answer);
                *self = AppState::Quiz(session);
                Ok(())
            }
            (AppState::Quiz(session), Event::Finish) => {
                *self = AppState::Results(session.into_score());
                Ok(())
            }
            (AppState::Results(_), Event::Restart) => {
                *self = AppState::Setup(SetupForm::default());
                Ok(())
            }
            (state, event) => {
                let err = TransitionError {
                    state: state.name(),
                    event: event.name(),
                };
                *self = state;
                Err(err)
            }
        }
    }
}

impl Event {
    fn name(&self) -> &'static str {
        match self {
            Event::Start => "start",
            Event::QuestionsReady(_) => "questions_ready",
            Event::LoadFailed => "load_failed",
            Event::Answer(_) => "answer",
            Event::Finish => "finish",
            Event::BrowseLibrary => "browse_library",
            Event::Back => "back",
            Event::Restart => "restart",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::QuestionKind;

    fn question() -> QuestionSpec {
        QuestionSpec {
            kind: QuestionKind::Mcq,
            prompt: "Q".to_string(),
            context_passage: String::new(),
            options: vec!["a".to_string(), "b".to_string()],
            correct_answer: "a".to_string(),
            model_answer: String::new(),
            explanation: String::new(),
            marks: 1,
        }
    }

    #[test]
    fn test_happy_path() {
        let mut state = AppState::Setup(SetupForm::default());
        state.apply(Event::Start).unwrap();
        assert_eq!(state.name(), "loading");

        state
            .apply(Event::QuestionsReady(vec![question(), question()]))
            .unwrap();
        assert_eq!(state.name(), "quiz");

        state
            .apply(Event::Answer(AnswerRecord::Text("a".to_string())))
            .unwrap();
        state
            .apply(Event::Answer(AnswerRecord::Text("b".to_string())))
            .unwrap();
        state.apply(Event::Finish).unwrap();

        match &state {
            AppState::Results(score) => {
                assert_eq!(score.possible, 2);
                assert_eq!(score.earned, 1.0);
            }
            other => panic!("expected results, got {}", other.name()),
        }

        state.apply(Event::Restart).unwrap();
        assert_eq!(state.name(), "setup");
    }

    #[test]
    fn test_browse_side_state() {
        let mut state = AppState::Setup(SetupForm::default());
        state.apply(Event::BrowseLibrary).unwrap();
        assert_eq!(state.name(), "browse");
        state.apply(Event::Back).unwrap();
        assert_eq!(state.name(), "setup");
    }

    #[test]
    fn test_load_failure_returns_to_setup() {
        let mut state = AppState::Setup(SetupForm::default());
        state.apply(Event::Start).unwrap();
        state.apply(Event::LoadFailed).unwrap();
        assert_eq!(state.name(), "setup");
    }

    #[test]
    fn test_illegal_transition_preserves_state() {
        let mut state = AppState::Setup(SetupForm::default());
        let err = state.apply(Event::Finish).unwrap_err();
        assert_eq!(err.state, "setup");
        assert_eq!(err.event, "finish");
        assert_eq!(state.name(), "setup");
    }

    #[test]
    fn test_answer_past_end_is_rejected() {
        let mut state = AppState::Setup(SetupForm::default());
        state.apply(Event::Start).unwrap();
        state.apply(Event::QuestionsReady(vec![question()])).unwrap();
        state
            .apply(Event::Answer(AnswerRecord::Skipped))
            .unwrap();
        assert!(state.apply(Event::Answer(AnswerRecord::Skipped)).is_err());
        // Still in quiz state, still finishable
        state.apply(Event::Finish).unwrap();
        assert_eq!(state.name(), "results");
    }

    #[test]
    fn test_answered_flags() {
        let mut session = QuizSession::new(vec![question(), question(), question()]);
        session.record(AnswerRecord::Text("a".to_string()));
        session.record(AnswerRecord::Skipped);
        assert!(session.answered(0));
        assert!(!session.answered(1));
        assert!(!session.answered(2));
        assert_eq!(session.cursor(), 2);
        assert!(!session.is_complete());
    }
}
