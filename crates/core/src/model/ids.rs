use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::difficulty::Difficulty;

/// Stable identifier of one practice question in the catalog pool.
///
/// The text form is `{topic}_{difficulty}_{ordinal}` and is unique across the
/// whole catalog and across all dates. Topics may themselves contain `_`, so
/// parsing splits from the right.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuestionId {
    topic: String,
    difficulty: Difficulty,
    ordinal: u32,
}

impl QuestionId {
    /// Creates a new `QuestionId`. Ordinals start at 1.
    ///
    /// # Errors
    ///
    /// Returns `ParseIdError` if the topic is blank or the ordinal is zero.
    pub fn new(
        topic: impl Into<String>,
        difficulty: Difficulty,
        ordinal: u32,
    ) -> Result<Self, ParseIdError> {
        let topic = topic.into();
        if topic.trim().is_empty() {
            return Err(ParseIdError::new("QuestionId", "empty topic"));
        }
        if ordinal == 0 {
            return Err(ParseIdError::new("QuestionId", "ordinal must be >= 1"));
        }
        Ok(Self {
            topic,
            difficulty,
            ordinal,
        })
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({self})")
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.topic, self.difficulty, self.ordinal)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: String,
    reason: String,
}

impl ParseIdError {
    fn new(kind: &str, reason: &str) -> Self {
        Self {
            kind: kind.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string: {}", self.kind, self.reason)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for QuestionId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.rsplitn(3, '_');
        let ordinal = parts
            .next()
            .and_then(|raw| raw.parse::<u32>().ok())
            .ok_or_else(|| ParseIdError::new("QuestionId", "missing ordinal"))?;
        let difficulty = parts
            .next()
            .and_then(|raw| raw.parse::<Difficulty>().ok())
            .ok_or_else(|| ParseIdError::new("QuestionId", "missing difficulty"))?;
        let topic = parts
            .next()
            .ok_or_else(|| ParseIdError::new("QuestionId", "missing topic"))?;
        Self::new(topic, difficulty, ordinal)
    }
}

impl TryFrom<String> for QuestionId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QuestionId> for String {
    fn from(id: QuestionId) -> Self {
        id.to_string()
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
