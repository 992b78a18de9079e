//! Saved quiz library
//!
//! Quizzes are stored as one pretty-printed JSON file per quiz under a
//! library directory, with an `index.json` mapping id to summary in
//! insertion order. Deliberately plain: no locking, no migrations.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::question::{QuestionKind, QuestionSpec};

/// Error types for library operations
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("library IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("library data error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no saved quiz with id {0}")]
    NotFound(String),
}

/// A quiz persisted to the library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedQuiz {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub difficulty: String,
    pub kind: QuestionKind,
    pub questions: Vec<QuestionSpec>,
}

/// Summary row kept in the library index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSummary {
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub kind: QuestionKind,
    pub question_count: usize,
}

/// File-backed store of saved quizzes
pub struct QuizLibrary {
    root: PathBuf,
}

impl QuizLibrary {
    /// Open a library rooted at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, LibraryError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Persist a quiz, assigning it an id derived from the title and
    /// creation time
    pub fn save(
        &self,
        title: &str,
        difficulty: &str,
        kind: QuestionKind,
        questions: Vec<QuestionSpec>,
    ) -> Result<SavedQuiz, LibraryError> {
        let created_at = Utc::now();
        let id = self.unique_id(title, created_at);

        let quiz = SavedQuiz {
            id: id.clone(),
            title: title.to_string(),
            created_at,
            difficulty: difficulty.to_string(),
            kind,
            questions,
        };

        let content = serde_json::to_string_pretty(&quiz)?;
        fs::write(self.quiz_path(&id), content)?;

        let mut index = self.read_index()?;
        index.insert(
            id,
            QuizSummary {
                title: quiz.title.clone(),
                created_at,
                kind,
                question_count: quiz.questions.len(),
            },
        );
        self.write_index(&index)?;

        Ok(quiz)
    }

    /// List saved quizzes in insertion order
    pub fn list(&self) -> Result<IndexMap<String, QuizSummary>, LibraryError> {
        self.read_index()
    }

    /// Load one saved quiz by id
    pub fn load(&self, id: &str) -> Result<SavedQuiz, LibraryError> {
        let path = self.quiz_path(id);
        if !path.exists() {
            return Err(LibraryError::NotFound(id.to_string()));
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Remove one saved quiz and its index entry
    pub fn delete(&self, id: &str) -> Result<(), LibraryError> {
        let mut index = self.read_index()?;
        if index.shift_remove(id).is_none() {
            return Err(LibraryError::NotFound(id.to_string()));
        }
        self.write_index(&index)?;

        let path = self.quiz_path(id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn unique_id(&self, title: &str, created_at: DateTime<Utc>) -> String {
        let base = format!("{}-{}", slugify(title), created_at.format("%Y%m%d-%H%M%S"));
        if !self.quiz_path(&base).exists() {
            return base;
        }
        // Same title saved within the same second
        let mut n = 2;
        loop {
            let candidate = format!("{}-{}", base, n);
            if !self.quiz_path(&candidate).exists() {
                return candidate;
            }
            n += 1;
        }
    }

    fn quiz_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }

    fn index_path(&self) -> PathBuf {
        self.root.join("index.json")
    }

    fn read_index(&self) -> Result<IndexMap<String, QuizSummary>, LibraryError> {
        let path = self.index_path();
        if !path.exists() {
            return Ok(IndexMap::new());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_index(&self, index: &IndexMap<String, QuizSummary>) -> Result<(), LibraryError> {
        let content = serde_json::to_string_pretty(index)?;
        fs::write(self.index_path(), content)?;
        Ok(())
    }
}

fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_dash = true;
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "quiz".to_string()
    } else {
        slug
    }
}
