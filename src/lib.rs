//! QuizForge: document-to-quiz toolkit
//!
//! Turns PDF study material into exam-style quizzes using Google Gemini,
//! grades handwritten answers from images, scores attempts locally, and
//! keeps a library of saved quizzes.
//!
//! # Features
//!
//! - Seven question kinds, from multiple choice to case-based essays
//! - Primary/fallback model protocol for resilient generation
//! - Defensive validation of all model output: kinds and marks are
//!   assigned locally, never trusted from the response
//! - Multimodal grading of handwritten answer images with clamped scores
//! - JSON quiz library with insertion-ordered index
//!
//! # Example
//!
//! ```no_run
//! use quizforge::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_or_default();
//!     let client = QuizClient::from_env(&config)?;
//!
//!     let text = quizforge::extract::extract_text_from_file("notes.pdf")?;
//!     let request = GenerationRequest::new(text, 5, QuestionKind::Mcq)
//!         .with_difficulty("hard");
//!     let questions = client.generate_questions(&request).await?;
//!
//!     for question in &questions {
//!         println!("[{} marks] {}", question.marks, question.prompt);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod extract;
pub mod library;
pub mod question;
pub mod scoring;
pub mod session;

pub use config::Config;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::client::{
        BackendError, EvaluationError, GeminiBackend, GenerationError, GenerationRequest,
        ModelBackend, ModelRequest, ModelResponse, QuizClient, RequestPart,
    };
    pub use crate::config::Config;
    pub use crate::extract::{extract_text, extract_text_from_file, ExtractError};
    pub use crate::library::{LibraryError, QuizLibrary, QuizSummary, SavedQuiz};
    pub use crate::question::{EvaluationResult, QuestionKind, QuestionSpec};
    pub use crate::scoring::{
        check_objective, score_attempt, AnswerRecord, AttemptScore, QuestionOutcome,
    };
    pub use crate::session::{AppState, Event, QuizSession, SetupForm, TransitionError};
}
