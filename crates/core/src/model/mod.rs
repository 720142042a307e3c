mod app_settings;
mod ids;
mod level;
mod progress;
mod question;
mod session;

pub use app_settings::{
    AppSettings, AppSettingsDraft, AppSettingsError, FontSize, FontType, MAX_SPEECH_RATE,
    MIN_SPEECH_RATE, Theme,
};
pub use ids::{LevelId, ParseIdError};

pub use level::{Level, LevelCatalog, LevelError, QUESTIONS_PER_LEVEL};
pub use progress::Progress;
pub use question::{Question, QuestionDraft, QuestionError};
pub use session::{LevelReport, QuizPhase};
