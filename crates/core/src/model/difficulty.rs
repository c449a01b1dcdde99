use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid difficulty: {raw}")]
pub struct DifficultyParseError {
    raw: String,
}

//
// ─── DIFFICULTY ───────────────────────────────────────────────────────────────
//

/// Difficulty bucket of a practice problem.
///
/// Ordering is fixed: `Easy < Medium < Hard`. Every enumeration over buckets
/// (question pool, rollups, persisted counts) follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = DifficultyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" | "e" => Ok(Self::Easy),
            "medium" | "m" => Ok(Self::Medium),
            "hard" | "h" => Ok(Self::Hard),
            _ => Err(DifficultyParseError { raw: s.to_owned() }),
        }
    }
}

//
// ─── COUNTS ───────────────────────────────────────────────────────────────────
//

/// Per-difficulty counters, used both for planned question counts and for
/// solved-question progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DifficultyCounts {
    #[serde(default)]
    pub easy: u32,
    #[serde(default)]
    pub medium: u32,
    #[serde(default)]
    pub hard: u32,
}

impl DifficultyCounts {
    #[must_use]
    pub fn new(easy: u32, medium: u32, hard: u32) -> Self {
        Self { easy, medium, hard }
    }

    #[must_use]
    pub fn get(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    pub fn set(&mut self, difficulty: Difficulty, count: u32) {
        match difficulty {
            Difficulty::Easy => self.easy = count,
            Difficulty::Medium => self.medium = count,
            Difficulty::Hard => self.hard = count,
        }
    }

    /// Sum over all three buckets.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.easy
            .saturating_add(self.medium)
            .saturating_add(self.hard)
    }

    /// Bucket-wise saturating sum.
    #[must_use]
    pub fn plus(self, other: Self) -> Self {
        Self {
            easy: self.easy.saturating_add(other.easy),
            medium: self.medium.saturating_add(other.medium),
            hard: self.hard.saturating_add(other.hard),
        }
    }

    /// Bucket-wise minimum.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self {
            easy: self.easy.min(other.easy),
            medium: self.medium.min(other.medium),
            hard: self.hard.min(other.hard),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_names() {
        assert_eq!("easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!("M".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert_eq!(" Hard ".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn counts_total_and_min() {
        let planned = DifficultyCounts::new(2, 1, 0);
        let solved = DifficultyCounts::new(5, 0, 3);
        assert_eq!(planned.total(), 3);
        assert_eq!(planned.min(solved), DifficultyCounts::new(2, 0, 0));
        assert_eq!(planned.plus(solved), DifficultyCounts::new(7, 1, 3));
    }

    #[test]
    fn counts_deserialize_with_missing_buckets() {
        let counts: DifficultyCounts = serde_json::from_str(r#"{"easy": 4}"#).unwrap();
        assert_eq!(counts, DifficultyCounts::new(4, 0, 0));
    }
}
