use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::difficulty::{Difficulty, DifficultyCounts};

//
// ─── DAY STATUS ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid day status: {raw}")]
pub struct DayStatusParseError {
    raw: String,
}

/// Lifecycle of a plan day. Any status may be overwritten with any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
}

impl DayStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DayStatus::Planned => "planned",
            DayStatus::InProgress => "in-progress",
            DayStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for DayStatus {
    type Err = DayStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "planned" => Ok(Self::Planned),
            "in-progress" | "in_progress" | "inprogress" => Ok(Self::InProgress),
            "completed" | "done" => Ok(Self::Completed),
            _ => Err(DayStatusParseError { raw: s.to_owned() }),
        }
    }
}

//
// ─── DAY POSITION ──────────────────────────────────────────────────────────────
//

/// Where a calendar date falls relative to the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPosition {
    /// The date is before the start date.
    NotStarted,
    /// The date maps onto this plan day.
    Active(u32),
    /// The date is past the last plan day.
    Finished,
}

//
// ─── PROGRESS LEDGER ───────────────────────────────────────────────────────────
//

/// Mutable per-day progress: status, solved counts and notes.
///
/// Entries are materialized on first write only; reading an unknown day yields
/// the defaults (`planned`, zero progress, empty note). The ledger never clamps
/// counts; bounding them against the catalog is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressLedger {
    start_date: NaiveDate,
    #[serde(default)]
    status: BTreeMap<u32, DayStatus>,
    #[serde(default)]
    question_progress: BTreeMap<u32, DifficultyCounts>,
    #[serde(default)]
    notes: BTreeMap<u32, String>,
}

impl ProgressLedger {
    #[must_use]
    pub fn new(start_date: NaiveDate) -> Self {
        Self {
            start_date,
            status: BTreeMap::new(),
            question_progress: BTreeMap::new(),
            notes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn set_start_date(&mut self, start_date: NaiveDate) {
        self.start_date = start_date;
    }

    /// Calendar date of a plan day: `start_date + (day - 1)`.
    ///
    /// Returns `None` for day 0 or dates out of chrono's range.
    #[must_use]
    pub fn date_for(&self, day: u32) -> Option<NaiveDate> {
        let offset = day.checked_sub(1)?;
        self.start_date.checked_add_days(Days::new(u64::from(offset)))
    }

    /// Map a calendar date onto a plan of `plan_len` days.
    #[must_use]
    pub fn position_of(&self, date: NaiveDate, plan_len: u32) -> DayPosition {
        let elapsed = (date - self.start_date).num_days();
        if elapsed < 0 {
            return DayPosition::NotStarted;
        }
        match u32::try_from(elapsed + 1) {
            Ok(day) if day <= plan_len => DayPosition::Active(day),
            _ => DayPosition::Finished,
        }
    }

    // ─── reads ─────────────────────────────────────────────────────────────────

    #[must_use]
    pub fn status(&self, day: u32) -> DayStatus {
        self.status.get(&day).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn question_progress(&self, day: u32) -> DifficultyCounts {
        self.question_progress.get(&day).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn solved(&self, day: u32, difficulty: Difficulty) -> u32 {
        self.question_progress(day).get(difficulty)
    }

    #[must_use]
    pub fn note(&self, day: u32) -> &str {
        self.notes.get(&day).map_or("", String::as_str)
    }

    /// Recorded statuses, keyed by day.
    pub fn statuses(&self) -> impl Iterator<Item = (u32, DayStatus)> + '_ {
        self.status.iter().map(|(day, status)| (*day, *status))
    }

    /// Recorded progress, keyed by day.
    pub fn progress_entries(&self) -> impl Iterator<Item = (u32, DifficultyCounts)> + '_ {
        self.question_progress
            .iter()
            .map(|(day, counts)| (*day, *counts))
    }

    /// Recorded notes, keyed by day.
    pub fn notes(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.notes.iter().map(|(day, note)| (*day, note.as_str()))
    }

    /// Smallest day number carrying any recorded entry.
    #[must_use]
    pub fn first_recorded_day(&self) -> Option<u32> {
        [
            self.status.keys().next(),
            self.question_progress.keys().next(),
            self.notes.keys().next(),
        ]
        .into_iter()
        .flatten()
        .min()
        .copied()
    }

    /// Number of days whose recorded status equals `status`.
    ///
    /// Only materialized entries count, so `planned` is usually undercounted.
    #[must_use]
    pub fn count_status(&self, status: DayStatus) -> u32 {
        let n = self.status.values().filter(|s| **s == status).count();
        u32::try_from(n).unwrap_or(u32::MAX)
    }

    // ─── mutators ──────────────────────────────────────────────────────────────

    pub fn set_status(&mut self, day: u32, status: DayStatus) {
        self.status.insert(day, status);
    }

    pub fn set_question_progress(&mut self, day: u32, difficulty: Difficulty, count: u32) {
        self.question_progress
            .entry(day)
            .or_default()
            .set(difficulty, count);
    }

    pub fn set_note(&mut self, day: u32, text: impl Into<String>) {
        self.notes.insert(day, text.into());
    }

    /// Clear statuses, progress and notes. The start date is kept.
    pub fn reset(&mut self) {
        self.status.clear();
        self.question_progress.clear();
        self.notes.clear();
    }
}
