//! Question taxonomy and the typed records exchanged with the model

pub mod kinds;
pub mod spec;

pub use kinds::{ParseKindError, QuestionKind};
pub use spec::{EvaluationResult, QuestionSpec};
