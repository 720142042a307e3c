#![forbid(unsafe_code)]

pub mod ai;
pub mod app_settings_service;
pub mod error;
pub mod narration;
pub mod quiz;

pub use dizai_core::Clock;

pub use ai::{AiClient, AiConfig, WritingCheck};
pub use app_settings_service::AppSettingsService;
pub use error::{AiError, AppSettingsServiceError, QuizError};
pub use narration::{Narrator, RecordingNarrator, SilentNarrator};
pub use quiz::{
    Advance, AnswerOutcome, Delivery, FallbackQuestionProvider, LevelStatus, QuestionDelivery,
    QuestionGenerator, QuestionProvider, QuestionRequest, QuizLoopService, QuizSessionEngine,
    RequestTag,
};
