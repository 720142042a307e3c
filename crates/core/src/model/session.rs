use chrono::{DateTime, Duration, Utc};

use crate::model::LevelId;

/// Step of a level session's question lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuizPhase {
    /// A question request is outstanding.
    Loading,
    /// A question is displayed and can be answered once.
    AwaitingAnswer,
    Correct,
    Incorrect,
    /// All questions were played; the report is shown until acknowledged.
    Finished,
}

impl QuizPhase {
    /// Whether the current question has been answered.
    #[must_use]
    pub fn is_resolved(self) -> bool {
        matches!(self, QuizPhase::Correct | QuizPhase::Incorrect)
    }
}

/// Outcome of a finished level. There is no pass mark: every finish counts
/// as completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelReport {
    level_id: LevelId,
    score: u32,
    total: u32,
    unlocked: Option<LevelId>,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl LevelReport {
    /// Build a report for a finished level.
    ///
    /// `score` is capped at `total`; `completed_at` is clamped to `started_at`.
    #[must_use]
    pub fn new(
        level_id: LevelId,
        score: u32,
        total: u32,
        unlocked: Option<LevelId>,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            level_id,
            score: score.min(total),
            total,
            unlocked,
            started_at,
            completed_at: completed_at.max(started_at),
        }
    }

    #[must_use]
    pub fn level_id(&self) -> LevelId {
        self.level_id
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Questions left to practice.
    #[must_use]
    pub fn wrong_count(&self) -> u32 {
        self.total - self.score
    }

    /// Level unlocked by this finish, if any.
    #[must_use]
    pub fn unlocked(&self) -> Option<LevelId> {
        self.unlocked
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.completed_at - self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn wrong_count_is_total_minus_score() {
        let now = fixed_now();
        let report = LevelReport::new(LevelId::new(1), 3, 5, None, now, now);
        assert_eq!(report.wrong_count(), 2);
        assert_eq!(report.elapsed(), Duration::zero());
    }

    #[test]
    fn score_is_capped_at_total() {
        let now = fixed_now();
        let report = LevelReport::new(LevelId::new(1), 6, 5, None, now, now);
        assert_eq!(report.score(), 5);
        assert_eq!(report.wrong_count(), 0);
    }

    #[test]
    fn completion_never_precedes_start() {
        let now = fixed_now();
        let report = LevelReport::new(
            LevelId::new(2),
            1,
            5,
            Some(LevelId::new(3)),
            now,
            now - Duration::seconds(30),
        );
        assert_eq!(report.completed_at(), now);
        assert_eq!(report.unlocked(), Some(LevelId::new(3)));
    }

    #[test]
    fn only_answered_phases_are_resolved() {
        assert!(QuizPhase::Correct.is_resolved());
        assert!(QuizPhase::Incorrect.is_resolved());
        assert!(!QuizPhase::Loading.is_resolved());
        assert!(!QuizPhase::Finished.is_resolved());
    }
}
