use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use crate::model::difficulty::{Difficulty, DifficultyCounts};

/// Resources shown when none of a day's topics has an entry.
pub const DEFAULT_RESOURCES: [&str; 2] = ["Practice fundamental problems", "Review basic concepts"];

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("day numbers must start at 1")]
    ZeroDay,

    #[error("day {day} appears more than once")]
    DuplicateDay { day: u32 },

    #[error("day numbers must be dense: expected day {expected}, found {found}")]
    GapInDays { expected: u32, found: u32 },

    #[error("day {day} has an empty phase")]
    EmptyPhase { day: u32 },
}

//
// ─── SOURCE RECORDS ────────────────────────────────────────────────────────────
//

/// Per-topic question counts scheduled on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicQuestions {
    pub topic: String,
    #[serde(flatten)]
    pub counts: DifficultyCounts,
}

impl TopicQuestions {
    #[must_use]
    pub fn new(topic: impl Into<String>, counts: DifficultyCounts) -> Self {
        Self {
            topic: topic.into(),
            counts,
        }
    }
}

/// Day record as it appears in a plan file.
///
/// `questions` may be omitted, in which case the per-topic breakdown is taken
/// from the global topic totals. The `total_*` fields are informational; the
/// per-topic sum is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDayRecord {
    pub day: u32,
    pub phase: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub questions: Option<Vec<TopicQuestions>>,
    #[serde(default)]
    pub total_easy: Option<u32>,
    #[serde(default)]
    pub total_medium: Option<u32>,
    #[serde(default)]
    pub total_hard: Option<u32>,
}

impl CatalogDayRecord {
    /// Totals declared by the record, if it declares any.
    #[must_use]
    pub fn declared_totals(&self) -> Option<DifficultyCounts> {
        if self.total_easy.is_none() && self.total_medium.is_none() && self.total_hard.is_none() {
            return None;
        }
        Some(DifficultyCounts::new(
            self.total_easy.unwrap_or(0),
            self.total_medium.unwrap_or(0),
            self.total_hard.unwrap_or(0),
        ))
    }
}

//
// ─── TOPIC TABLES ──────────────────────────────────────────────────────────────
//

/// Global topic → question counts table, ordered by topic name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicTotals(BTreeMap<String, DifficultyCounts>);

impl TopicTotals {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, topic: impl Into<String>, counts: DifficultyCounts) {
        self.0.insert(topic.into(), counts);
    }

    #[must_use]
    pub fn get(&self, topic: &str) -> Option<DifficultyCounts> {
        self.0.get(topic).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, DifficultyCounts)> {
        self.0.iter().map(|(topic, counts)| (topic.as_str(), *counts))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<(String, DifficultyCounts)> for TopicTotals {
    fn from_iter<T: IntoIterator<Item = (String, DifficultyCounts)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Topic → freeform study resources.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resources(BTreeMap<String, Vec<String>>);

impl Resources {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, topic: impl Into<String>, items: Vec<String>) {
        self.0.insert(topic.into(), items);
    }

    #[must_use]
    pub fn get(&self, topic: &str) -> Option<&[String]> {
        self.0.get(topic).map(Vec::as_slice)
    }
}

//
// ─── CATALOG DAY ───────────────────────────────────────────────────────────────
//

/// One day of the study plan. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogDay {
    day: u32,
    phase: String,
    topics: Vec<String>,
    questions: Vec<TopicQuestions>,
    totals: DifficultyCounts,
}

impl CatalogDay {
    #[must_use]
    pub fn new(
        day: u32,
        phase: impl Into<String>,
        topics: Vec<String>,
        questions: Vec<TopicQuestions>,
    ) -> Self {
        let totals = questions
            .iter()
            .fold(DifficultyCounts::default(), |acc, q| acc.plus(q.counts));
        Self {
            day,
            phase: phase.into(),
            topics,
            questions,
            totals,
        }
    }

    /// Build a day from a plan-file record.
    ///
    /// Records without a `questions` list borrow each listed topic's counts from
    /// `topic_totals`; topics missing there contribute nothing.
    #[must_use]
    pub fn from_record(record: CatalogDayRecord, topic_totals: &TopicTotals) -> Self {
        let questions = match record.questions {
            Some(questions) => questions,
            None => record
                .topics
                .iter()
                .map(|topic| {
                    TopicQuestions::new(topic.clone(), topic_totals.get(topic).unwrap_or_default())
                })
                .collect(),
        };
        Self::new(record.day, record.phase, record.topics, questions)
    }

    #[must_use]
    pub fn day(&self) -> u32 {
        self.day
    }

    #[must_use]
    pub fn phase(&self) -> &str {
        &self.phase
    }

    #[must_use]
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    #[must_use]
    pub fn questions(&self) -> &[TopicQuestions] {
        &self.questions
    }

    #[must_use]
    pub fn totals(&self) -> DifficultyCounts {
        self.totals
    }

    #[must_use]
    pub fn total_for(&self, difficulty: Difficulty) -> u32 {
        self.totals.get(difficulty)
    }
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// The whole curriculum: days, the global topic table and study resources.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    days: Vec<CatalogDay>,
    topic_totals: TopicTotals,
    resources: Resources,
}

impl Catalog {
    /// Build a catalog, checking that day numbers are exactly `1..=N`.
    ///
    /// Days may be given in any order; they are stored sorted.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` for zero, duplicate or missing day numbers, or a
    /// blank phase.
    pub fn new(
        mut days: Vec<CatalogDay>,
        topic_totals: TopicTotals,
        resources: Resources,
    ) -> Result<Self, CatalogError> {
        days.sort_by_key(CatalogDay::day);

        let mut seen = HashSet::with_capacity(days.len());
        for day in &days {
            if day.day == 0 {
                return Err(CatalogError::ZeroDay);
            }
            if !seen.insert(day.day) {
                return Err(CatalogError::DuplicateDay { day: day.day });
            }
            if day.phase.trim().is_empty() {
                return Err(CatalogError::EmptyPhase { day: day.day });
            }
        }
        for (expected, day) in (1_u32..).zip(&days) {
            if day.day != expected {
                return Err(CatalogError::GapInDays {
                    expected,
                    found: day.day,
                });
            }
        }

        Ok(Self {
            days,
            topic_totals,
            resources,
        })
    }

    /// An empty catalog, used when nothing could be loaded.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn days(&self) -> &[CatalogDay] {
        &self.days
    }

    #[must_use]
    pub fn day(&self, day: u32) -> Option<&CatalogDay> {
        let idx = usize::try_from(day.checked_sub(1)?).ok()?;
        self.days.get(idx)
    }

    #[must_use]
    pub fn contains_day(&self, day: u32) -> bool {
        self.day(day).is_some()
    }

    /// Number of days in the plan.
    #[must_use]
    pub fn len(&self) -> u32 {
        u32::try_from(self.days.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    #[must_use]
    pub fn topic_totals(&self) -> &TopicTotals {
        &self.topic_totals
    }

    #[must_use]
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Planned count for one day and difficulty; zero for unknown days.
    #[must_use]
    pub fn total_for(&self, day: u32, difficulty: Difficulty) -> u32 {
        self.day(day).map_or(0, |d| d.total_for(difficulty))
    }

    /// Distinct phases in order of first appearance.
    #[must_use]
    pub fn phases(&self) -> Vec<&str> {
        let mut phases: Vec<&str> = Vec::new();
        for day in &self.days {
            if !phases.contains(&day.phase()) {
                phases.push(day.phase());
            }
        }
        phases
    }

    /// Concatenated resources for the given topics, or the generic default list.
    #[must_use]
    pub fn resources_for(&self, topics: &[String]) -> Vec<String> {
        let found: Vec<String> = topics
            .iter()
            .filter_map(|topic| self.resources.get(topic))
            .flatten()
            .cloned()
            .collect();
        if found.is_empty() {
            DEFAULT_RESOURCES.iter().map(|s| (*s).to_string()).collect()
        } else {
            found
        }
    }
}
