use std::sync::Arc;

use dizai_core::Clock;
use dizai_core::model::{LevelCatalog, LevelId, LevelReport, Progress, Question, QuizPhase};
use storage::repository::ProgressRepository;

use super::engine::{Advance, Delivery, QuestionRequest, QuizSessionEngine, RequestTag};
use super::provider::QuestionProvider;
use crate::error::QuizError;
use crate::narration::Narrator;

/// A fetched question together with the request it answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDelivery {
    pub tag: RequestTag,
    pub question: Question,
}

/// Orchestrates the engine with the question provider and progress storage.
///
/// Persistence is best-effort: storage failures are logged and play continues.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    catalog: Arc<LevelCatalog>,
    provider: Arc<dyn QuestionProvider>,
    narrator: Arc<dyn Narrator>,
    progress: Arc<dyn ProgressRepository>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        catalog: Arc<LevelCatalog>,
        provider: Arc<dyn QuestionProvider>,
        narrator: Arc<dyn Narrator>,
        progress: Arc<dyn ProgressRepository>,
    ) -> Self {
        Self {
            clock,
            catalog,
            provider,
            narrator,
            progress,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    /// Build an engine seeded with the stored progress.
    pub async fn open(&self) -> QuizSessionEngine {
        let stored = match self.progress.load_max_unlocked_level().await {
            Ok(stored) => stored,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load progress; starting from level 1");
                None
            }
        };
        let progress = Progress::from_persisted(stored, &self.catalog);
        tracing::debug!(max_unlocked = %progress.max_unlocked_level(), "progress loaded");

        QuizSessionEngine::new(
            Arc::clone(&self.catalog),
            progress,
            Arc::clone(&self.narrator),
        )
        .with_clock(self.clock)
    }

    /// Ask the provider for the question described by `request`.
    pub async fn fetch_question(&self, request: &QuestionRequest) -> QuestionDelivery {
        let question = self.provider.generate(request.level_context()).await;
        QuestionDelivery {
            tag: request.tag(),
            question,
        }
    }

    /// Start `level_id` and load its first question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidLevel` if the level cannot be played.
    pub async fn start_level(
        &self,
        engine: &mut QuizSessionEngine,
        level_id: LevelId,
    ) -> Result<Delivery, QuizError> {
        let request = engine.start_level(level_id)?;
        let delivery = self.fetch_question(&request).await;
        Ok(engine.question_ready(delivery.tag, delivery.question))
    }

    /// Move past the answered question, loading the next one if any.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidPhase` if the current question is unanswered.
    pub async fn advance(&self, engine: &mut QuizSessionEngine) -> Result<QuizPhase, QuizError> {
        if let Advance::Next(request) = engine.advance()? {
            let delivery = self.fetch_question(&request).await;
            engine.question_ready(delivery.tag, delivery.question);
        }
        engine.phase().ok_or(QuizError::InvalidPhase {
            operation: "advance",
            phase: None,
        })
    }

    /// Acknowledge the finished level and persist any unlock.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidPhase` unless the level is finished.
    pub async fn finish(&self, engine: &mut QuizSessionEngine) -> Result<LevelReport, QuizError> {
        let report = engine.acknowledge_finish()?;
        if report.unlocked().is_some() {
            self.save_progress(engine.max_unlocked_level()).await;
        }
        Ok(report)
    }

    /// Reset to level 1 and persist it.
    pub async fn reset_progress(&self, engine: &mut QuizSessionEngine) {
        engine.reset_progress();
        self.save_progress(engine.max_unlocked_level()).await;
    }

    async fn save_progress(&self, max_unlocked: LevelId) {
        if let Err(err) = self
            .progress
            .save_max_unlocked_level(max_unlocked.value())
            .await
        {
            tracing::warn!(error = %err, level = %max_unlocked, "failed to save progress");
        }
    }
}
