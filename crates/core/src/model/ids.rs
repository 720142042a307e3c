use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a curriculum level. Levels are numbered from 1.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelId(u32);

impl LevelId {
    /// The first level of every catalog.
    pub const FIRST: LevelId = LevelId(1);

    /// Creates a new `LevelId`
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the underlying u32 value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Returns the id of the level that follows this one.
    #[must_use]
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Debug for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LevelId({})", self.0)
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for parsing ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    raw: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse LevelId from {:?}", self.raw)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for LevelId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .filter(|id| *id > 0)
            .map(LevelId::new)
            .ok_or_else(|| ParseIdError { raw: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_id_display() {
        assert_eq!(LevelId::new(3).to_string(), "3");
    }

    #[test]
    fn level_id_from_str() {
        let id: LevelId = " 4 ".parse().unwrap();
        assert_eq!(id, LevelId::new(4));
    }

    #[test]
    fn level_id_rejects_zero_and_garbage() {
        assert!("0".parse::<LevelId>().is_err());
        assert!("dois".parse::<LevelId>().is_err());
    }

    #[test]
    fn next_saturates() {
        assert_eq!(LevelId::new(1).next(), LevelId::new(2));
        assert_eq!(LevelId::new(u32::MAX).next(), LevelId::new(u32::MAX));
    }
}
