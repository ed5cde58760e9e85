//! Error types for Loan QA.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application: configuration, I/O, input parsing, LLM transport,
//! answer generation, retrieval, prompts, and serialization.

use thiserror::Error;

/// Unified error type for Loan QA.
///
/// All fallible functions in the workspace return `Result<T, AppError>`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed input data (tabular file, rules table)
    #[error("Parse error: {0}")]
    Parse(String),

    /// LLM provider transport and protocol errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// The text-generation step failed to produce an answer.
    ///
    /// Kept distinct from a valid answer so callers can decide how to
    /// render the failure.
    #[error("{0}")]
    Generation(String),

    /// Corpus and retrieval errors
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Attach a path to an I/O error while keeping its kind.
    pub fn io_at(path: &std::path::Path, err: std::io::Error) -> Self {
        AppError::Io(std::io::Error::new(
            err.kind(),
            format!("{}: {}", path.display(), err),
        ))
    }

    /// Whether this error came from the text-generation step.
    pub fn is_generation(&self) -> bool {
        matches!(self, AppError::Generation(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_io_at_keeps_kind_and_names_path() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let wrapped = AppError::io_at(Path::new("data/train.csv"), err);

        match wrapped {
            AppError::Io(inner) => {
                assert_eq!(inner.kind(), std::io::ErrorKind::NotFound);
                assert!(inner.to_string().contains("data/train.csv"));
            }
            other => panic!("Expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_generation_display_is_bare_detail() {
        let err = AppError::Generation("upstream returned 401".to_string());
        assert!(err.is_generation());
        assert_eq!(err.to_string(), "upstream returned 401");
        assert!(!AppError::Other("x".to_string()).is_generation());
    }
}
