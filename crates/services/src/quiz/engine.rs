use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

use dizai_core::Clock;
use dizai_core::model::{
    Level, LevelCatalog, LevelId, LevelReport, Progress, QUESTIONS_PER_LEVEL, Question, QuizPhase,
};

use crate::error::QuizError;
use crate::narration::{Narrator, phrases};

//
// ─── REQUESTS ──────────────────────────────────────────────────────────────────
//

/// Identifies the question slot a request was issued for.
///
/// A delivery is only applied when its tag matches the outstanding request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTag {
    level_id: LevelId,
    question_index: u32,
    sequence: u64,
}

impl RequestTag {
    #[must_use]
    pub fn level_id(&self) -> LevelId {
        self.level_id
    }

    #[must_use]
    pub fn question_index(&self) -> u32 {
        self.question_index
    }
}

/// A question the caller must obtain from the question provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRequest {
    tag: RequestTag,
    level_context: String,
}

impl QuestionRequest {
    #[must_use]
    pub fn tag(&self) -> RequestTag {
        self.tag
    }

    #[must_use]
    pub fn level_context(&self) -> &str {
        &self.level_context
    }
}

/// Whether a delivered question was taken or thrown away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Applied,
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Another question is needed; the engine is back in `Loading`.
    Next(QuestionRequest),
    /// The level is over and the report is waiting for acknowledgement.
    Finished,
}

/// Result of answering the live question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: String,
    pub explanation: String,
    pub feedback: String,
    pub is_last_question: bool,
}

/// Catalog entry with its derived lock state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelStatus<'a> {
    pub level: &'a Level,
    pub locked: bool,
    /// Strictly below the highest unlocked level.
    pub completed: bool,
    /// The highest unlocked level.
    pub current: bool,
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

struct ActiveSession {
    level: Level,
    question_index: u32,
    score: u32,
    phase: QuizPhase,
    question: Option<Question>,
    feedback: Option<String>,
    pending: Option<RequestTag>,
    started_at: DateTime<Utc>,
}

impl ActiveSession {
    fn issue_request(&mut self, sequence: u64) -> QuestionRequest {
        let tag = RequestTag {
            level_id: self.level.id(),
            question_index: self.question_index,
            sequence,
        };
        self.phase = QuizPhase::Loading;
        self.pending = Some(tag);
        self.question = None;
        self.feedback = None;
        QuestionRequest {
            tag,
            level_context: self.level.prompt_context().to_string(),
        }
    }
}

/// Drives one literacy-quiz playthrough at a time.
///
/// The engine performs no I/O: it hands out [`QuestionRequest`]s and expects the
/// caller to feed the provider's answer back through [`Self::question_ready`].
/// Narration is fire-and-forget.
pub struct QuizSessionEngine {
    catalog: Arc<LevelCatalog>,
    progress: Progress,
    narrator: Arc<dyn Narrator>,
    clock: Clock,
    questions_per_level: u32,
    sequence: u64,
    session: Option<ActiveSession>,
}

impl QuizSessionEngine {
    #[must_use]
    pub fn new(catalog: Arc<LevelCatalog>, progress: Progress, narrator: Arc<dyn Narrator>) -> Self {
        Self {
            catalog,
            progress,
            narrator,
            clock: Clock::default(),
            questions_per_level: QUESTIONS_PER_LEVEL,
            sequence: 0,
            session: None,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Override the number of questions per level (at least 1).
    #[must_use]
    pub fn with_questions_per_level(mut self, count: u32) -> Self {
        self.questions_per_level = count.max(1);
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        self.progress
    }

    #[must_use]
    pub fn max_unlocked_level(&self) -> LevelId {
        self.progress.max_unlocked_level()
    }

    #[must_use]
    pub fn questions_per_level(&self) -> u32 {
        self.questions_per_level
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn phase(&self) -> Option<QuizPhase> {
        self.session.as_ref().map(|s| s.phase)
    }

    #[must_use]
    pub fn active_level(&self) -> Option<&Level> {
        self.session.as_ref().map(|s| &s.level)
    }

    /// 1-based index of the current question.
    #[must_use]
    pub fn question_index(&self) -> Option<u32> {
        self.session.as_ref().map(|s| s.question_index)
    }

    #[must_use]
    pub fn score(&self) -> Option<u32> {
        self.session.as_ref().map(|s| s.score)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.session.as_ref().and_then(|s| s.question.as_ref())
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.feedback.as_deref())
    }

    #[must_use]
    pub fn pending_request(&self) -> Option<RequestTag> {
        self.session.as_ref().and_then(|s| s.pending)
    }

    /// The catalog with lock state derived from current progress.
    #[must_use]
    pub fn levels(&self) -> Vec<LevelStatus<'_>> {
        let max = self.progress.max_unlocked_level();
        self.catalog
            .iter()
            .map(|level| LevelStatus {
                level,
                locked: level.is_locked(&self.progress),
                completed: level.id() < max,
                current: level.id() == max,
            })
            .collect()
    }

    /// Begin a playthrough of `level_id`, replacing any active session.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidLevel` if the level is locked or not in the
    /// catalog; state is left untouched.
    pub fn start_level(&mut self, level_id: LevelId) -> Result<QuestionRequest, QuizError> {
        let level = self
            .catalog
            .get(level_id)
            .filter(|_| self.progress.is_unlocked(level_id))
            .cloned()
            .ok_or(QuizError::InvalidLevel {
                level: level_id,
                max_unlocked: self.progress.max_unlocked_level(),
            })?;

        self.narrator.say(&phrases::level_started(level.title()));
        tracing::debug!(level = %level_id, "quiz level started");

        let mut session = ActiveSession {
            level,
            question_index: 1,
            score: 0,
            phase: QuizPhase::Loading,
            question: None,
            feedback: None,
            pending: None,
            started_at: self.clock.now(),
        };
        self.sequence += 1;
        let request = session.issue_request(self.sequence);
        self.session = Some(session);
        Ok(request)
    }

    /// Hand over the provider's question for the request tagged `tag`.
    ///
    /// Deliveries for anything but the outstanding request are discarded.
    pub fn question_ready(&mut self, tag: RequestTag, question: Question) -> Delivery {
        let Some(session) = self.session.as_mut() else {
            tracing::debug!(?tag, "discarding question: no active session");
            return Delivery::Stale;
        };
        if session.phase != QuizPhase::Loading || session.pending != Some(tag) {
            tracing::debug!(?tag, pending = ?session.pending, "discarding stale question");
            return Delivery::Stale;
        }

        self.narrator.say(question.prompt());
        session.pending = None;
        session.question = Some(question);
        session.phase = QuizPhase::AwaitingAnswer;
        Delivery::Applied
    }

    /// Answer the live question. Comparison is exact string equality.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidPhase` unless a question is awaiting an
    /// answer; score and phase are left untouched.
    pub fn submit_answer(&mut self, choice: &str) -> Result<AnswerOutcome, QuizError> {
        let questions_per_level = self.questions_per_level;
        let session = match self.session.as_mut() {
            Some(s) if s.phase == QuizPhase::AwaitingAnswer && s.question.is_some() => s,
            other => {
                return Err(QuizError::InvalidPhase {
                    operation: "submit_answer",
                    phase: other.map(|s| s.phase),
                });
            }
        };
        let Some(question) = session.question.as_ref() else {
            return Err(QuizError::InvalidPhase {
                operation: "submit_answer",
                phase: Some(session.phase),
            });
        };

        let correct = question.is_correct(choice);
        let is_last_question = session.question_index >= questions_per_level;
        let correct_answer = question.correct_answer().to_string();
        let explanation = question.explanation().to_string();

        let feedback = if correct {
            session.score += 1;
            session.phase = QuizPhase::Correct;
            if is_last_question {
                phrases::LEVEL_COMPLETE.to_string()
            } else {
                phrases::CORRECT.to_string()
            }
        } else {
            session.phase = QuizPhase::Incorrect;
            phrases::incorrect(&correct_answer)
        };
        // The level report replaces the feedback panel after the last correct answer.
        session.feedback = (!correct || !is_last_question).then(|| feedback.clone());
        self.narrator.say(&feedback);

        Ok(AnswerOutcome {
            correct,
            correct_answer,
            explanation,
            feedback,
            is_last_question,
        })
    }

    /// Move past an answered question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidPhase` unless the current question was answered.
    pub fn advance(&mut self) -> Result<Advance, QuizError> {
        let questions_per_level = self.questions_per_level;
        let session = match self.session.as_mut() {
            Some(s) if s.phase.is_resolved() => s,
            other => {
                return Err(QuizError::InvalidPhase {
                    operation: "advance",
                    phase: other.map(|s| s.phase),
                });
            }
        };

        if session.question_index < questions_per_level {
            session.question_index += 1;
            self.sequence += 1;
            return Ok(Advance::Next(session.issue_request(self.sequence)));
        }

        session.phase = QuizPhase::Finished;
        session.pending = None;
        tracing::debug!(
            level = %session.level.id(),
            score = session.score,
            "quiz level finished"
        );
        Ok(Advance::Finished)
    }

    /// Close the report of a finished level, unlocking the next level when the
    /// frontier level was played.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidPhase` unless the level is finished.
    pub fn acknowledge_finish(&mut self) -> Result<LevelReport, QuizError> {
        let Some(session) = self
            .session
            .take_if(|s| s.phase == QuizPhase::Finished)
        else {
            return Err(QuizError::InvalidPhase {
                operation: "acknowledge_finish",
                phase: self.phase(),
            });
        };

        let level_id = session.level.id();
        let unlocked = self.progress.complete(level_id, &self.catalog);
        if let Some(next) = unlocked {
            self.narrator.say(phrases::LEVEL_UNLOCKED);
            tracing::info!(level = %next, "level unlocked");
        }

        Ok(LevelReport::new(
            level_id,
            session.score,
            self.questions_per_level,
            unlocked,
            session.started_at,
            self.clock.now(),
        ))
    }

    /// Lock everything but the first level again.
    pub fn reset_progress(&mut self) {
        self.progress.reset();
        self.narrator.say(phrases::PROGRESS_RESET);
        tracing::info!("progress reset");
    }

    /// Leave the active session without finishing it. Any outstanding request
    /// becomes stale. Returns whether a session was active.
    pub fn abandon(&mut self) -> bool {
        self.session.take().is_some()
    }

    /// Speak the displayed question again. Returns whether there was one.
    pub fn repeat_question(&self) -> bool {
        match self.current_question() {
            Some(question) => {
                self.narrator.say(question.prompt());
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for QuizSessionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSessionEngine")
            .field("levels", &self.catalog.len())
            .field("max_unlocked", &self.progress.max_unlocked_level())
            .field("questions_per_level", &self.questions_per_level)
            .field("phase", &self.phase())
            .field("level", &self.active_level().map(Level::id))
            .field("question_index", &self.question_index())
            .field("score", &self.score())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
