use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::model::ids::QuestionId;
use crate::sampler;

/// Persisted state of the daily question sampler.
///
/// Each date key (`YYYY-MM-DD`) owns the list generated for it the first time
/// it was asked for, and a set of questions completed on that date. Whether a
/// question was ever completed is the union over all dates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyLedger {
    #[serde(default)]
    completed: BTreeMap<String, BTreeSet<QuestionId>>,
    #[serde(default)]
    daily_questions: BTreeMap<String, Vec<QuestionId>>,
    #[serde(default)]
    last_generated: Option<String>,
}

impl DailyLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate from persisted parts.
    #[must_use]
    pub fn from_persisted(
        completed: BTreeMap<String, BTreeSet<QuestionId>>,
        daily_questions: BTreeMap<String, Vec<QuestionId>>,
        last_generated: Option<String>,
    ) -> Self {
        Self {
            completed,
            daily_questions,
            last_generated,
        }
    }

    /// Completed sets, keyed by date.
    pub fn completed_sets(&self) -> impl Iterator<Item = (&str, &BTreeSet<QuestionId>)> {
        self.completed.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Generated lists, keyed by date.
    pub fn generated(&self) -> impl Iterator<Item = (&str, &[QuestionId])> {
        self.daily_questions
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Questions for `date_key`, generating and caching them on first access.
    ///
    /// Once cached, the list is returned as-is even if `pool` changed since.
    pub fn questions_for(&mut self, date_key: &str, pool: &[QuestionId]) -> &[QuestionId] {
        if !self.daily_questions.contains_key(date_key) {
            let drawn = sampler::daily_questions(pool, date_key);
            self.daily_questions.insert(date_key.to_owned(), drawn);
            self.last_generated = Some(date_key.to_owned());
        }
        self.daily_questions
            .get(date_key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Cached list for `date_key`, if one was generated.
    #[must_use]
    pub fn cached(&self, date_key: &str) -> Option<&[QuestionId]> {
        self.daily_questions.get(date_key).map(Vec::as_slice)
    }

    #[must_use]
    pub fn last_generated(&self) -> Option<&str> {
        self.last_generated.as_deref()
    }

    /// Record `id` as completed on `today_key`. Membership in that day's list is
    /// not checked.
    ///
    /// Returns `false` if it was already recorded for that date.
    pub fn mark_complete(&mut self, id: QuestionId, today_key: &str) -> bool {
        self.completed
            .entry(today_key.to_owned())
            .or_default()
            .insert(id)
    }

    /// Remove `id` from every date's completed set.
    ///
    /// Returns `true` if anything was removed.
    pub fn mark_incomplete(&mut self, id: &QuestionId) -> bool {
        let mut removed = false;
        for set in self.completed.values_mut() {
            removed |= set.remove(id);
        }
        self.completed.retain(|_, set| !set.is_empty());
        removed
    }

    /// True if `id` was completed on any date.
    #[must_use]
    pub fn is_completed(&self, id: &QuestionId) -> bool {
        self.completed.values().any(|set| set.contains(id))
    }

    /// Questions recorded as completed on `date_key`.
    #[must_use]
    pub fn completed_on(&self, date_key: &str) -> Vec<&QuestionId> {
        self.completed
            .get(date_key)
            .map(|set| set.iter().collect())
            .unwrap_or_default()
    }

    /// Distinct questions completed across all dates.
    #[must_use]
    pub fn total_completed(&self) -> usize {
        self.completed
            .values()
            .flatten()
            .collect::<BTreeSet<_>>()
            .len()
    }
}
