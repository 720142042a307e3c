use crate::model::ids::LevelId;
use crate::model::level::LevelCatalog;

/// Highest level the learner may play.
///
/// Only moves forward one level at a time, except for an explicit reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    max_unlocked: LevelId,
}

impl Progress {
    /// Fresh progress for the given catalog: only the first level is open.
    #[must_use]
    pub fn for_catalog(catalog: &LevelCatalog) -> Self {
        Self::from_persisted(None, catalog)
    }

    /// Rehydrate progress from a stored value, clamping it into the catalog range.
    #[must_use]
    pub fn from_persisted(stored: Option<u32>, catalog: &LevelCatalog) -> Self {
        let value = stored
            .unwrap_or(1)
            .clamp(LevelId::FIRST.value(), catalog.last_id().value());
        Self {
            max_unlocked: LevelId::new(value),
        }
    }

    #[must_use]
    pub fn max_unlocked_level(&self) -> LevelId {
        self.max_unlocked
    }

    #[must_use]
    pub fn is_unlocked(&self, id: LevelId) -> bool {
        id >= LevelId::FIRST && id <= self.max_unlocked
    }

    /// Record that `completed` was finished.
    ///
    /// Returns the newly unlocked level when `completed` was the frontier level
    /// and not the final one.
    pub fn complete(&mut self, completed: LevelId, catalog: &LevelCatalog) -> Option<LevelId> {
        if completed != self.max_unlocked || catalog.is_final(completed) {
            return None;
        }
        self.max_unlocked = completed.next();
        Some(self.max_unlocked)
    }

    pub fn reset(&mut self) {
        self.max_unlocked = LevelId::FIRST;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::level::Level;

    #[test]
    fn completing_frontier_unlocks_next() {
        let catalog = LevelCatalog::literacy();
        let mut progress = Progress::for_catalog(&catalog);
        assert_eq!(progress.complete(LevelId::new(1), &catalog), Some(LevelId::new(2)));
        assert_eq!(progress.max_unlocked_level(), LevelId::new(2));
    }

    #[test]
    fn replaying_earlier_level_changes_nothing() {
        let catalog = LevelCatalog::literacy();
        let mut progress = Progress::from_persisted(Some(3), &catalog);
        assert_eq!(progress.complete(LevelId::new(2), &catalog), None);
        assert_eq!(progress.max_unlocked_level(), LevelId::new(3));
    }

    #[test]
    fn final_level_never_unlocks_past_catalog() {
        let catalog = LevelCatalog::literacy();
        let mut progress = Progress::from_persisted(Some(8), &catalog);
        assert_eq!(progress.complete(LevelId::new(8), &catalog), None);
        assert_eq!(progress.max_unlocked_level(), LevelId::new(8));
    }

    #[test]
    fn final_level_follows_the_catalog() {
        let levels = (1..=2)
            .map(|id| Level::new(LevelId::new(id), format!("Nível {id}"), "", "contexto").unwrap())
            .collect();
        let short = LevelCatalog::new(levels).unwrap();
        let mut progress = Progress::from_persisted(Some(2), &short);
        assert_eq!(progress.complete(LevelId::new(2), &short), None);

        let full = LevelCatalog::literacy();
        assert_eq!(
            progress.complete(LevelId::new(2), &full),
            Some(LevelId::new(3))
        );
    }

    #[test]
    fn persisted_values_are_clamped() {
        let catalog = LevelCatalog::literacy();
        assert_eq!(
            Progress::from_persisted(Some(0), &catalog).max_unlocked_level(),
            LevelId::new(1)
        );
        assert_eq!(
            Progress::from_persisted(Some(42), &catalog).max_unlocked_level(),
            LevelId::new(8)
        );
        assert_eq!(
            Progress::from_persisted(None, &catalog).max_unlocked_level(),
            LevelId::new(1)
        );
    }

    #[test]
    fn reset_returns_to_first_level() {
        let catalog = LevelCatalog::literacy();
        let mut progress = Progress::from_persisted(Some(5), &catalog);
        progress.reset();
        assert_eq!(progress.max_unlocked_level(), LevelId::FIRST);
        assert!(!progress.is_unlocked(LevelId::new(2)));
    }
}
