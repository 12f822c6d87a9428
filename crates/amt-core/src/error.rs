//! Assessment error types.
//!
//! Loaders return `anyhow::Result` but raise these variants at the root so
//! the CLI (and tests) can classify a failure with `downcast_ref` instead of
//! string matching.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while preparing or running an assessment.
#[derive(Debug, Error)]
pub enum AssessmentError {
    /// A directory argument points at something that is not a directory.
    #[error("{} must be a directory", .0.display())]
    NotADirectory(PathBuf),

    /// A schema file could not be read.
    #[error("schema file not found: {}", .path.display())]
    MissingSchema { path: PathBuf },

    /// A schema file was read but is not a usable schema.
    #[error("invalid schema {}: {reason}", .path.display())]
    InvalidSchema { path: PathBuf, reason: String },

    /// A questionnaire uses a question type the engine does not know.
    #[error("unexpected question type {kind} in {}", .path.display())]
    UnsupportedQuestionType { path: PathBuf, kind: String },

    /// A questionnaire is structurally unusable even in best-effort mode.
    #[error("malformed questionnaire {}: {reason}", .path.display())]
    MalformedQuestionnaire { path: PathBuf, reason: String },
}

impl AssessmentError {
    /// Returns `true` for errors caused by the run configuration rather than
    /// by questionnaire content.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            AssessmentError::NotADirectory(_)
                | AssessmentError::MissingSchema { .. }
                | AssessmentError::InvalidSchema { .. }
        )
    }
}
