use thiserror::Error;

use crate::model::{AppSettingsError, LevelError, QuestionError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Settings(#[from] AppSettingsError),
}
