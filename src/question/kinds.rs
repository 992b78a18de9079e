//! Question kind enumeration and the fixed marks table

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The closed set of question kinds the generator understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Multiple choice, 4 options, one correct answer
    Mcq,
    /// Sentence with a literal blank marker to fill in
    FillBlanks,
    /// One-line answer
    VeryShort,
    /// A few sentences
    Short,
    /// Essay-length answer
    Long,
    /// Question over a supplied case study passage
    CaseBased,
    /// Question over a supplied source extract
    ExtractBased,
}

impl QuestionKind {
    /// Marks awarded for one question of this kind.
    ///
    /// Scoring always uses this table; marks claimed in model output are
    /// ignored so scoring stays consistent across model drift.
    pub fn marks(&self) -> u32 {
        match self {
            QuestionKind::Mcq => 1,
            QuestionKind::FillBlanks => 1,
            QuestionKind::VeryShort => 2,
            QuestionKind::Short => 3,
            QuestionKind::CaseBased => 4,
            QuestionKind::ExtractBased => 4,
            QuestionKind::Long => 5,
        }
    }

    /// Objective kinds are checked locally by exact match; the rest are
    /// graded by the model against a reference answer.
    pub fn is_objective(&self) -> bool {
        matches!(self, QuestionKind::Mcq | QuestionKind::FillBlanks)
    }

    /// Kinds that require a supporting passage in the generated question
    pub fn needs_context(&self) -> bool {
        matches!(self, QuestionKind::CaseBased | QuestionKind::ExtractBased)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::Mcq => "mcq",
            QuestionKind::FillBlanks => "fill_blanks",
            QuestionKind::VeryShort => "very_short",
            QuestionKind::Short => "short",
            QuestionKind::Long => "long",
            QuestionKind::CaseBased => "case_based",
            QuestionKind::ExtractBased => "extract_based",
        }
    }

    /// Human-readable name for console output and prompts
    pub fn display_name(&self) -> &'static str {
        match self {
            QuestionKind::Mcq => "Multiple Choice",
            QuestionKind::FillBlanks => "Fill in the Blanks",
            QuestionKind::VeryShort => "Very Short Answer",
            QuestionKind::Short => "Short Answer",
            QuestionKind::Long => "Long Answer",
            QuestionKind::CaseBased => "Case Based",
            QuestionKind::ExtractBased => "Extract Based",
        }
    }

    pub fn all() -> Vec<QuestionKind> {
        vec![
            QuestionKind::Mcq,
            QuestionKind::FillBlanks,
            QuestionKind::VeryShort,
            QuestionKind::Short,
            QuestionKind::Long,
            QuestionKind::CaseBased,
            QuestionKind::ExtractBased,
        ]
    }
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for unrecognized kind names at the CLI boundary
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown question kind: {0} (expected one of mcq, fill-blanks, very-short, short, long, case-based, extract-based)")]
pub struct ParseKindError(String);

impl FromStr for QuestionKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "mcq" | "multiple_choice" => Ok(QuestionKind::Mcq),
            "fill_blanks" | "fill_in_blanks" => Ok(QuestionKind::FillBlanks),
            "very_short" => Ok(QuestionKind::VeryShort),
            "short" => Ok(QuestionKind::Short),
            "long" => Ok(QuestionKind::Long),
            "case_based" => Ok(QuestionKind::CaseBased),
            "extract_based" => Ok(QuestionKind::ExtractBased),
            _ => Err(ParseKindError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_table() {
        assert_eq!(QuestionKind::Mcq.marks(), 1);
        assert_eq!(QuestionKind::FillBlanks.marks(), 1);
        assert_eq!(QuestionKind::VeryShort.marks(), 2);
        assert_eq!(QuestionKind::Short.marks(), 3);
        assert_eq!(QuestionKind::CaseBased.marks(), 4);
        assert_eq!(QuestionKind::ExtractBased.marks(), 4);
        assert_eq!(QuestionKind::Long.marks(), 5);
    }

    #[test]
    fn test_objective_classification() {
        assert!(QuestionKind::Mcq.is_objective());
        assert!(QuestionKind::FillBlanks.is_objective());
        assert!(!QuestionKind::Short.is_objective());
        assert!(!QuestionKind::Long.is_objective());
        assert!(!QuestionKind::CaseBased.is_objective());
    }

    #[test]
    fn test_parse_round_trip() {
        for kind in QuestionKind::all() {
            let parsed: QuestionKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_parse_accepts_dashes() {
        assert_eq!("fill-blanks".parse::<QuestionKind>().unwrap(), QuestionKind::FillBlanks);
        assert_eq!("CASE-BASED".parse::<QuestionKind>().unwrap(), QuestionKind::CaseBased);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("essay".parse::<QuestionKind>().is_err());
    }
}
