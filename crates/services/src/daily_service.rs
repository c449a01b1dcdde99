use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use plan_core::document;
use plan_core::model::{Catalog, DailyLedger, QuestionId};
use plan_core::sampler::question_pool;
use plan_core::time::date_key;
use storage::repository::DailyRepository;

use crate::Clock;
use crate::error::DailyError;

/// One sampled question with its all-time completion flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyQuestion {
    pub id: QuestionId,
    pub completed: bool,
}

/// Snapshot of one date's daily set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySummary {
    pub date_key: String,
    pub questions: Vec<DailyQuestion>,
    pub completed_today: usize,
    pub total_completed: usize,
    pub pool_size: usize,
}

/// Deterministic daily question sets over the catalog's topic totals.
#[derive(Clone)]
pub struct DailyService {
    clock: Clock,
    pool: Arc<[QuestionId]>,
    daily: Arc<dyn DailyRepository>,
}

impl DailyService {
    #[must_use]
    pub fn new(clock: Clock, catalog: &Catalog, daily: Arc<dyn DailyRepository>) -> Self {
        Self {
            clock,
            pool: question_pool(catalog.topic_totals()).into(),
            daily,
        }
    }

    #[must_use]
    pub fn pool(&self) -> &[QuestionId] {
        &self.pool
    }

    /// Today's set, see [`DailyService::questions_for`].
    ///
    /// # Errors
    ///
    /// Returns `DailyError::Storage` if the daily ledger cannot be loaded or saved.
    pub async fn todays_questions(&self) -> Result<DailySummary, DailyError> {
        self.questions_for(self.clock.today()).await
    }

    /// The set for `date`, generated and persisted on first access.
    ///
    /// # Errors
    ///
    /// Returns `DailyError::Storage` if the daily ledger cannot be loaded or saved.
    pub async fn questions_for(&self, date: NaiveDate) -> Result<DailySummary, DailyError> {
        let key = date_key(date);
        let mut ledger = self.daily.load_daily().await?;
        if ledger.cached(&key).is_none() {
            let drawn = ledger.questions_for(&key, &self.pool).len();
            self.daily.save_daily(&ledger).await?;
            info!(date = %key, drawn, pool = self.pool.len(), "daily questions generated");
        }
        Ok(self.summarize(&ledger, key))
    }

    /// Record `id` as completed today.
    ///
    /// Returns `false` if it was already recorded today.
    ///
    /// # Errors
    ///
    /// Returns `DailyError::Storage` if the daily ledger cannot be loaded or saved.
    pub async fn mark_complete(&self, id: QuestionId) -> Result<bool, DailyError> {
        let today = self.clock.today_key();
        let mut ledger = self.daily.load_daily().await?;
        let label = id.to_string();
        let added = ledger.mark_complete(id, &today);
        if added {
            self.daily.save_daily(&ledger).await?;
            debug!(question = %label, date = %today, "daily question completed");
        }
        Ok(added)
    }

    /// Forget every completion of `id`.
    ///
    /// # Errors
    ///
    /// Returns `DailyError::Storage` if the daily ledger cannot be loaded or saved.
    pub async fn mark_incomplete(&self, id: &QuestionId) -> Result<bool, DailyError> {
        let mut ledger = self.daily.load_daily().await?;
        let removed = ledger.mark_incomplete(id);
        if removed {
            self.daily.save_daily(&ledger).await?;
            debug!(question = %id, "daily question reopened");
        }
        Ok(removed)
    }

    /// Pretty JSON dump of the daily ledger.
    ///
    /// # Errors
    ///
    /// Returns `DailyError` if loading or encoding fails.
    pub async fn export(&self) -> Result<String, DailyError> {
        let ledger = self.daily.load_daily().await?;
        Ok(document::export(&ledger)?)
    }

    /// Replace the daily ledger with an exported document.
    ///
    /// # Errors
    ///
    /// Returns `DailyError::Document` for malformed input, or
    /// `DailyError::Storage` if persistence fails.
    pub async fn import(&self, raw: &str) -> Result<DailyLedger, DailyError> {
        let ledger: DailyLedger = document::import(raw)?;
        self.daily.save_daily(&ledger).await?;
        info!("daily progress imported");
        Ok(ledger)
    }

    fn summarize(&self, ledger: &DailyLedger, key: String) -> DailySummary {
        let questions: Vec<DailyQuestion> = ledger
            .cached(&key)
            .unwrap_or_default()
            .iter()
            .map(|id| DailyQuestion {
                id: id.clone(),
                completed: ledger.is_completed(id),
            })
            .collect();
        DailySummary {
            completed_today: ledger.completed_on(&key).len(),
            total_completed: ledger.total_completed(),
            pool_size: self.pool.len(),
            questions,
            date_key: key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use plan_core::model::{Difficulty, DifficultyCounts, Resources, TopicTotals};
    use plan_core::time::fixed_today;
    use storage::repository::InMemoryRepository;

    fn catalog() -> Catalog {
        let mut totals = TopicTotals::new();
        totals.insert("Arrays", DifficultyCounts::new(5, 3, 2));
        totals.insert("Graphs", DifficultyCounts::new(1, 4, 3));
        Catalog::new(vec![], totals, Resources::new()).unwrap()
    }

    #[tokio::test]
    async fn same_date_returns_cached_set() {
        let repo = Arc::new(InMemoryRepository::new());
        let svc = DailyService::new(Clock::fixed(fixed_today()), &catalog(), repo.clone());
        assert_eq!(svc.pool().len(), 18);

        let first = svc.todays_questions().await.unwrap();
        let second = svc.todays_questions().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.questions.len(), 5);
        assert_eq!(first.date_key, "2024-01-01");

        // A service over a different pool still sees the stored list.
        let other = DailyService::new(Clock::fixed(fixed_today()), &Catalog::empty(), repo);
        let third = other.todays_questions().await.unwrap();
        assert_eq!(third.questions, first.questions);
    }

    #[tokio::test]
    async fn completion_carries_across_dates() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut clock = Clock::fixed(fixed_today());
        let svc = DailyService::new(clock, &catalog(), repo.clone());

        let today = svc.todays_questions().await.unwrap();
        let target = today.questions[0].id.clone();
        assert!(svc.mark_complete(target.clone()).await.unwrap());
        assert!(!svc.mark_complete(target.clone()).await.unwrap());

        let summary = svc.todays_questions().await.unwrap();
        assert!(summary.questions[0].completed);
        assert_eq!(summary.completed_today, 1);

        clock.advance_days(1);
        let tomorrow = DailyService::new(clock, &catalog(), repo);
        let summary = tomorrow.questions_for(fixed_today()).await.unwrap();
        assert_eq!(summary.total_completed, 1);
        let next = tomorrow.todays_questions().await.unwrap();
        assert_eq!(next.completed_today, 0);
        assert_eq!(next.total_completed, 1);
    }

    #[tokio::test]
    async fn mark_complete_accepts_questions_outside_todays_set() {
        let repo = Arc::new(InMemoryRepository::new());
        let svc = DailyService::new(Clock::fixed(fixed_today()), &catalog(), repo);
        let stray = QuestionId::new("Tries", Difficulty::Hard, 9).unwrap();
        assert!(svc.mark_complete(stray.clone()).await.unwrap());
        assert!(svc.mark_incomplete(&stray).await.unwrap());
        assert!(!svc.mark_incomplete(&stray).await.unwrap());
    }

    #[tokio::test]
    async fn malformed_import_keeps_state() {
        let repo = Arc::new(InMemoryRepository::new());
        let svc = DailyService::new(Clock::fixed(fixed_today()), &catalog(), repo);
        let before = svc.todays_questions().await.unwrap();

        assert!(matches!(
            svc.import("{ nope").await,
            Err(DailyError::Document(_))
        ));
        assert_eq!(svc.todays_questions().await.unwrap(), before);

        let dumped = svc.export().await.unwrap();
        svc.import(&dumped).await.unwrap();
        assert_eq!(svc.todays_questions().await.unwrap(), before);
    }
}
