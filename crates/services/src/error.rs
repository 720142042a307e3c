//! Shared error types for the services crate.

use thiserror::Error;

use dizai_core::model::{AppSettingsError, LevelId, QuestionError, QuizPhase};
use storage::repository::StorageError;

/// Misuse of the quiz engine. Well-behaved callers never trigger these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("level {level} is not playable (highest unlocked is {max_unlocked})")]
    InvalidLevel { level: LevelId, max_unlocked: LevelId },
    #[error("{operation} is not allowed in phase {phase:?}")]
    InvalidPhase {
        operation: &'static str,
        phase: Option<QuizPhase>,
    },
}

/// Errors emitted by the generative AI client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AiError {
    #[error("AI client is not configured")]
    Disabled,
    #[error("AI returned an empty response")]
    EmptyResponse,
    #[error("AI request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("AI returned malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    InvalidQuestion(#[from] QuestionError),
}

/// Errors emitted by `AppSettingsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppSettingsServiceError {
    #[error(transparent)]
    Validation(#[from] AppSettingsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
