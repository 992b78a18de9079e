//! Configuration management for the quiz toolkit
//!
//! Loads settings from TOML files and provides runtime access. Everything
//! has a sensible default; only the API credential comes from the
//! environment (see [`crate::client::GeminiBackend::from_env`]).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub library: LibraryConfig,
}

/// Model identifiers for the two-tier generation protocol and evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Model tried first for question generation
    #[serde(default = "default_primary_model")]
    pub primary: String,
    /// Model the whole request is retried against when the primary fails
    #[serde(default = "default_fallback_model")]
    pub fallback: String,
    /// Model used for answer grading (no fallback tier)
    #[serde(default = "default_evaluation_model")]
    pub evaluation: String,
}

/// Generation request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_question_count")]
    pub default_question_count: u32,
    #[serde(default = "default_difficulty")]
    pub default_difficulty: String,
    /// Source text beyond this many characters is dropped before the
    /// request is built, bounding request size and cost
    #[serde(default = "default_max_source_chars")]
    pub max_source_chars: usize,
}

/// Saved quiz library settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    #[serde(default = "default_library_dir")]
    pub directory: String,
}

// Default value functions
fn default_primary_model() -> String { "gemini-2.0-flash".to_string() }
fn default_fallback_model() -> String { "gemini-1.5-flash".to_string() }
fn default_evaluation_model() -> String { "gemini-2.0-flash".to_string() }
fn default_question_count() -> u32 { 5 }
fn default_difficulty() -> String { "medium".to_string() }
fn default_max_source_chars() -> usize { 30_000 }
fn default_library_dir() -> String { "library".to_string() }

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            primary: default_primary_model(),
            fallback: default_fallback_model(),
            evaluation: default_evaluation_model(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_question_count: default_question_count(),
            default_difficulty: default_difficulty(),
            max_source_chars: default_max_source_chars(),
        }
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            directory: default_library_dir(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from a conventional config location or return defaults
    pub fn load_or_default() -> Self {
        let config_paths = ["quizforge.toml", "config/quizforge.toml"];

        for path in &config_paths {
            if let Ok(config) = Self::from_file(path) {
                tracing::info!("Loaded configuration from {}", path);
                return config;
            }
        }

        tracing::info!("Using default configuration");
        Self::default()
    }

    /// Save configuration to a TOML file
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.generation.max_source_chars, 30_000);
        assert_eq!(config.generation.default_question_count, 5);
        assert_ne!(config.models.primary, config.models.fallback);
    }

    #[test]
    fn test_parse_toml_config() {
        let toml = r#"
[models]
primary = "gemini-test-pro"
fallback = "gemini-test-flash"

[generation]
default_question_count = 10
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.models.primary, "gemini-test-pro");
        assert_eq!(config.models.fallback, "gemini-test-flash");
        assert_eq!(config.generation.default_question_count, 10);
        // Unspecified sections and fields keep their defaults
        assert_eq!(config.models.evaluation, "gemini-2.0-flash");
        assert_eq!(config.library.directory, "library");
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        let reparsed = Config::from_toml(&toml).unwrap();
        assert_eq!(reparsed.models.primary, config.models.primary);
        assert_eq!(reparsed.generation.max_source_chars, config.generation.max_source_chars);
    }

    #[test]
    fn test_invalid_toml_fails() {
        assert!(Config::from_toml("models = 3").is_err());
    }
}
