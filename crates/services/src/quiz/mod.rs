mod engine;
mod provider;
mod workflow;

pub use engine::{
    Advance, AnswerOutcome, Delivery, LevelStatus, QuestionRequest, QuizSessionEngine, RequestTag,
};
pub use provider::{FallbackQuestionProvider, QuestionGenerator, QuestionProvider};
pub use workflow::{QuestionDelivery, QuizLoopService};
