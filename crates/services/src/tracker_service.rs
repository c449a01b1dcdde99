use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use plan_core::document;
use plan_core::model::{Catalog, DayPosition, DayStatus, Difficulty, ProgressLedger};
use plan_core::stats::{self, DifficultyProgress, Metrics, PhaseProgress, TopicProgress};
use storage::repository::LedgerRepository;

use crate::Clock;
use crate::error::TrackerError;
use crate::plan_view::{DayView, PlanFilter, TodayView, plan_views};

/// Commands and queries over the progress ledger of one study plan.
///
/// Every command loads the stored ledger, applies one mutation and saves the
/// whole ledger back, so the next read always sees it. When nothing is stored
/// yet, a fresh ledger starting today is used.
#[derive(Clone)]
pub struct TrackerService {
    clock: Clock,
    catalog: Arc<Catalog>,
    ledgers: Arc<dyn LedgerRepository>,
}

impl TrackerService {
    #[must_use]
    pub fn new(clock: Clock, catalog: Arc<Catalog>, ledgers: Arc<dyn LedgerRepository>) -> Self {
        Self {
            clock,
            catalog,
            ledgers,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // ─── queries ───────────────────────────────────────────────────────────────

    /// Current ledger.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Storage` if the ledger cannot be loaded.
    pub async fn ledger(&self) -> Result<ProgressLedger, TrackerError> {
        let stored = self.ledgers.load_ledger().await?;
        Ok(stored.unwrap_or_else(|| ProgressLedger::new(self.clock.today())))
    }

    /// Headline metrics as of today.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Storage` if the ledger cannot be loaded.
    pub async fn metrics(&self) -> Result<Metrics, TrackerError> {
        let ledger = self.ledger().await?;
        Ok(stats::metrics(&self.catalog, &ledger, self.clock.today()))
    }

    /// Per-topic completion.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Storage` if the ledger cannot be loaded.
    pub async fn topic_rollup(&self) -> Result<Vec<TopicProgress>, TrackerError> {
        let ledger = self.ledger().await?;
        Ok(stats::topic_rollup(&self.catalog, &ledger))
    }

    /// Per-difficulty completion.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Storage` if the ledger cannot be loaded.
    pub async fn difficulty_rollup(&self) -> Result<Vec<DifficultyProgress>, TrackerError> {
        let ledger = self.ledger().await?;
        Ok(stats::difficulty_rollup(&self.catalog, &ledger))
    }

    /// Day statuses grouped by phase.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Storage` if the ledger cannot be loaded.
    pub async fn phase_rollup(&self) -> Result<Vec<PhaseProgress>, TrackerError> {
        let ledger = self.ledger().await?;
        Ok(stats::phase_rollup(&self.catalog, &ledger))
    }

    /// Plan days matching `filter`, in day order.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Storage` if the ledger cannot be loaded.
    pub async fn plan(&self, filter: &PlanFilter) -> Result<Vec<DayView>, TrackerError> {
        let ledger = self.ledger().await?;
        Ok(plan_views(&self.catalog, &ledger, filter, self.clock.today()))
    }

    /// Where today falls in the plan.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Storage` if the ledger cannot be loaded.
    pub async fn today_view(&self) -> Result<TodayView, TrackerError> {
        let ledger = self.ledger().await?;
        let today = self.clock.today();
        let position = ledger.position_of(today, self.catalog.len());
        let day = match position {
            DayPosition::Active(n) => self
                .catalog
                .day(n)
                .map(|d| DayView::build(&self.catalog, &ledger, d, today)),
            DayPosition::NotStarted | DayPosition::Finished => None,
        };
        Ok(TodayView {
            date: today,
            position,
            day,
        })
    }

    /// Pretty JSON dump of the ledger.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError` if loading or encoding fails.
    pub async fn export_progress(&self) -> Result<String, TrackerError> {
        let ledger = self.ledger().await?;
        Ok(document::export(&ledger)?)
    }

    // ─── commands ──────────────────────────────────────────────────────────────

    /// Overwrite a day's status. Any transition is allowed.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::UnknownDay` for days outside the plan, or
    /// `TrackerError::Storage` if persistence fails.
    pub async fn set_status(&self, day: u32, status: DayStatus) -> Result<(), TrackerError> {
        self.check_day(day)?;
        self.update(|ledger| ledger.set_status(day, status)).await?;
        debug!(day, %status, "day status updated");
        Ok(())
    }

    /// Overwrite the solved count for one day and difficulty.
    ///
    /// The count must lie within the day's planned questions for that
    /// difficulty; the ledger itself does not clamp.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::UnknownDay` or `TrackerError::CountOutOfRange` for
    /// out-of-bounds input, or `TrackerError::Storage` if persistence fails.
    pub async fn set_question_progress(
        &self,
        day: u32,
        difficulty: Difficulty,
        count: u32,
    ) -> Result<(), TrackerError> {
        self.check_day(day)?;
        let max = self.catalog.total_for(day, difficulty);
        if count > max {
            return Err(TrackerError::CountOutOfRange {
                day,
                difficulty,
                count,
                max,
            });
        }
        self.update(|ledger| ledger.set_question_progress(day, difficulty, count))
            .await?;
        debug!(day, %difficulty, count, "question progress updated");
        Ok(())
    }

    /// Overwrite a day's note.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::UnknownDay` for days outside the plan, or
    /// `TrackerError::Storage` if persistence fails.
    pub async fn set_note(&self, day: u32, text: String) -> Result<(), TrackerError> {
        self.check_day(day)?;
        self.update(|ledger| ledger.set_note(day, text)).await?;
        debug!(day, "note updated");
        Ok(())
    }

    /// Move the plan's start date.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Storage` if persistence fails.
    pub async fn set_start_date(&self, start: NaiveDate) -> Result<(), TrackerError> {
        self.update(|ledger| ledger.set_start_date(start)).await?;
        info!(%start, "start date changed");
        Ok(())
    }

    /// Mark the plan day falling on today as completed.
    ///
    /// Outside the plan's date range nothing changes and the boundary position
    /// is returned instead.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Storage` if persistence fails.
    pub async fn mark_today_completed(&self) -> Result<DayPosition, TrackerError> {
        let mut ledger = self.ledger().await?;
        let position = ledger.position_of(self.clock.today(), self.catalog.len());
        if let DayPosition::Active(day) = position {
            ledger.set_status(day, DayStatus::Completed);
            self.ledgers.save_ledger(&ledger).await?;
            info!(day, "marked today as completed");
        }
        Ok(position)
    }

    /// Clear statuses, progress and notes. The start date is kept.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Storage` if persistence fails.
    pub async fn reset(&self) -> Result<(), TrackerError> {
        self.update(ProgressLedger::reset).await?;
        info!("all progress reset");
        Ok(())
    }

    /// Replace the ledger with an exported document.
    ///
    /// Malformed input and entries keyed by day 0 are rejected before anything
    /// is written. Days past the end of the plan are kept as-is.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Document` for malformed input,
    /// `TrackerError::ZeroDayInDocument` for day-0 entries, or
    /// `TrackerError::Storage` if persistence fails.
    pub async fn import_progress(&self, raw: &str) -> Result<ProgressLedger, TrackerError> {
        let ledger: ProgressLedger = document::import(raw)?;
        if ledger.first_recorded_day() == Some(0) {
            return Err(TrackerError::ZeroDayInDocument);
        }
        self.ledgers.save_ledger(&ledger).await?;
        info!(start = %ledger.start_date(), "progress imported");
        Ok(ledger)
    }

    fn check_day(&self, day: u32) -> Result<(), TrackerError> {
        if self.catalog.contains_day(day) {
            Ok(())
        } else {
            Err(TrackerError::UnknownDay {
                day,
                plan_len: self.catalog.len(),
            })
        }
    }

    async fn update(
        &self,
        apply: impl FnOnce(&mut ProgressLedger),
    ) -> Result<ProgressLedger, TrackerError> {
        let mut ledger = self.ledger().await?;
        apply(&mut ledger);
        self.ledgers.save_ledger(&ledger).await?;
        Ok(ledger)
    }
}
