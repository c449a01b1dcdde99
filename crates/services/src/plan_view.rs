use chrono::NaiveDate;

use plan_core::model::{
    Catalog, CatalogDay, DayPosition, DayStatus, DifficultyCounts, ProgressLedger, TopicQuestions,
};

/// Filter for the plan listing. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanFilter {
    pub phase: Option<String>,
    pub status: Option<DayStatus>,
}

impl PlanFilter {
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = Some(phase.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: DayStatus) -> Self {
        self.status = Some(status);
        self
    }

    fn matches(&self, day: &CatalogDay, ledger: &ProgressLedger) -> bool {
        let phase_ok = self.phase.as_deref().is_none_or(|p| day.phase() == p);
        let status_ok = self.status.is_none_or(|s| ledger.status(day.day()) == s);
        phase_ok && status_ok
    }
}

/// Everything a day card shows.
#[derive(Debug, Clone, PartialEq)]
pub struct DayView {
    pub day: u32,
    pub phase: String,
    pub topics: Vec<String>,
    pub questions: Vec<TopicQuestions>,
    pub date: Option<NaiveDate>,
    pub is_today: bool,
    pub status: DayStatus,
    pub totals: DifficultyCounts,
    pub solved: DifficultyCounts,
    pub note: String,
    pub resources: Vec<String>,
}

impl DayView {
    pub(crate) fn build(
        catalog: &Catalog,
        ledger: &ProgressLedger,
        day: &CatalogDay,
        today: NaiveDate,
    ) -> Self {
        let date = ledger.date_for(day.day());
        Self {
            day: day.day(),
            phase: day.phase().to_owned(),
            topics: day.topics().to_vec(),
            questions: day.questions().to_vec(),
            date,
            is_today: date == Some(today),
            status: ledger.status(day.day()),
            totals: day.totals(),
            solved: ledger.question_progress(day.day()),
            note: ledger.note(day.day()).to_owned(),
            resources: catalog.resources_for(day.topics()),
        }
    }
}

/// "Today's focus": where today falls in the plan and, when inside it, that day.
#[derive(Debug, Clone, PartialEq)]
pub struct TodayView {
    pub date: NaiveDate,
    pub position: DayPosition,
    pub day: Option<DayView>,
}

pub(crate) fn plan_views(
    catalog: &Catalog,
    ledger: &ProgressLedger,
    filter: &PlanFilter,
    today: NaiveDate,
) -> Vec<DayView> {
    catalog
        .days()
        .iter()
        .filter(|day| filter.matches(day, ledger))
        .map(|day| DayView::build(catalog, ledger, day, today))
        .collect()
}
