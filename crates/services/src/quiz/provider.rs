use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;

use dizai_core::model::Question;

use crate::error::AiError;

/// Source of quiz questions. Never fails: implementations fall back to a
/// built-in question when generation is unavailable.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    async fn generate(&self, level_context: &str) -> Question;
}

/// Fallible question source, usually backed by a generative model.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Produce a question for the given level context.
    ///
    /// # Errors
    ///
    /// Returns `AiError` when the model is unreachable or its output is unusable.
    async fn try_generate(&self, level_context: &str) -> Result<Question, AiError>;
}

/// Wraps a generator and substitutes a random built-in question on failure.
#[derive(Clone, Default)]
pub struct FallbackQuestionProvider {
    generator: Option<Arc<dyn QuestionGenerator>>,
}

impl FallbackQuestionProvider {
    #[must_use]
    pub fn new(generator: Arc<dyn QuestionGenerator>) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    /// Provider that only serves built-in questions.
    #[must_use]
    pub fn offline() -> Self {
        Self { generator: None }
    }
}

#[async_trait]
impl QuestionProvider for FallbackQuestionProvider {
    async fn generate(&self, level_context: &str) -> Question {
        let Some(generator) = &self.generator else {
            return pick_fallback();
        };
        match generator.try_generate(level_context).await {
            Ok(question) => question,
            Err(err) => {
                tracing::warn!(error = %err, "question generation failed; using fallback");
                pick_fallback()
            }
        }
    }
}

fn pick_fallback() -> Question {
    let mut bank = Question::fallback_bank();
    let index = rand::rng().random_range(0..bank.len());
    bank.swap_remove(index)
}
