//! Pure aggregate queries over a catalog and a progress ledger.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::model::{Catalog, DayStatus, Difficulty, DifficultyCounts, ProgressLedger};

/// Headline numbers for the overview panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_days: u32,
    pub completed_days: u32,
    pub in_progress_days: u32,
    pub completion_rate: f64,
    pub current_streak: u32,
    pub total_questions: u32,
    pub completed_questions: u32,
    pub question_completion_rate: f64,
}

/// Completion of one topic across the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicProgress {
    pub topic: String,
    pub total: u32,
    pub completed: u32,
    pub easy_completed: u32,
    pub medium_completed: u32,
    pub hard_completed: u32,
}

impl TopicProgress {
    fn new(topic: &str, total: u32) -> Self {
        Self {
            topic: topic.to_owned(),
            total,
            completed: 0,
            easy_completed: 0,
            medium_completed: 0,
            hard_completed: 0,
        }
    }

    fn credit(&mut self, solved: DifficultyCounts) {
        self.easy_completed = self.easy_completed.saturating_add(solved.easy);
        self.medium_completed = self.medium_completed.saturating_add(solved.medium);
        self.hard_completed = self.hard_completed.saturating_add(solved.hard);
        self.completed = self.completed.saturating_add(solved.total());
    }

    #[must_use]
    pub fn completion_rate(&self) -> f64 {
        completion_rate(self.completed, self.total)
    }
}

/// Planned vs solved questions for one difficulty bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DifficultyProgress {
    pub difficulty: Difficulty,
    pub planned: u32,
    pub solved: u32,
}

impl DifficultyProgress {
    #[must_use]
    pub fn completion_rate(&self) -> f64 {
        completion_rate(self.solved, self.planned)
    }
}

/// Day statuses grouped by phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseProgress {
    pub phase: String,
    pub total_days: u32,
    pub completed_days: u32,
    pub in_progress_days: u32,
}

/// `100 * numerator / denominator`, or `0.0` when the denominator is zero.
#[must_use]
pub fn completion_rate(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    100.0 * f64::from(numerator) / f64::from(denominator)
}

/// Size of the whole question pool.
///
/// Uses the topic totals table; catalogs without one fall back to summing the
/// per-day breakdown. The two sources are not cross-checked.
#[must_use]
pub fn total_questions(catalog: &Catalog) -> u32 {
    if catalog.topic_totals().is_empty() {
        return catalog
            .days()
            .iter()
            .fold(0_u32, |acc, day| acc.saturating_add(day.totals().total()));
    }
    catalog
        .topic_totals()
        .iter()
        .fold(0_u32, |acc, (_, counts)| acc.saturating_add(counts.total()))
}

/// Solved questions recorded for the plan's days.
#[must_use]
pub fn completed_questions(catalog: &Catalog, ledger: &ProgressLedger) -> u32 {
    (1..=catalog.len()).fold(0_u32, |acc, day| {
        acc.saturating_add(ledger.question_progress(day).total())
    })
}

/// Running count of completed days, scanned from day 1 up to `today`.
///
/// Every non-completed day on or before `today` resets the count to zero, so
/// the result is the length of the completed run that ends at the last day
/// whose date is not after `today`. A pending day today therefore yields 0
/// even when yesterday closed a long run.
#[must_use]
pub fn current_streak(catalog: &Catalog, ledger: &ProgressLedger, today: NaiveDate) -> u32 {
    let mut streak = 0_u32;
    for day in 1..=catalog.len() {
        let Some(date) = ledger.date_for(day) else {
            break;
        };
        if date > today {
            break;
        }
        if ledger.status(day) == DayStatus::Completed {
            streak += 1;
        } else {
            streak = 0;
        }
    }
    streak
}

/// Per-topic completion.
///
/// Progress is recorded per day and difficulty, not per topic, so each topic
/// scheduled on a day is credited `min(topic count, day progress)` for every
/// difficulty. Topics sharing a day can therefore both claim the same solves.
#[must_use]
pub fn topic_rollup(catalog: &Catalog, ledger: &ProgressLedger) -> Vec<TopicProgress> {
    let mut rollup: Vec<TopicProgress> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut from_days: Vec<bool> = Vec::new();

    for (topic, counts) in catalog.topic_totals().iter() {
        index.insert(topic.to_owned(), rollup.len());
        rollup.push(TopicProgress::new(topic, counts.total()));
        from_days.push(false);
    }

    for day in catalog.days() {
        let progress = ledger.question_progress(day.day());
        for entry in day.questions() {
            let idx = *index.entry(entry.topic.clone()).or_insert_with(|| {
                rollup.push(TopicProgress::new(&entry.topic, 0));
                from_days.push(true);
                rollup.len() - 1
            });
            if from_days[idx] {
                rollup[idx].total = rollup[idx].total.saturating_add(entry.counts.total());
            }
            rollup[idx].credit(entry.counts.min(progress));
        }
    }

    rollup
}

/// Planned vs solved per difficulty, summed over every plan day.
#[must_use]
pub fn difficulty_rollup(catalog: &Catalog, ledger: &ProgressLedger) -> Vec<DifficultyProgress> {
    Difficulty::ALL
        .iter()
        .map(|&difficulty| {
            let (planned, solved) = catalog.days().iter().fold((0_u32, 0_u32), |(p, s), day| {
                (
                    p.saturating_add(day.total_for(difficulty)),
                    s.saturating_add(ledger.solved(day.day(), difficulty)),
                )
            });
            DifficultyProgress {
                difficulty,
                planned,
                solved,
            }
        })
        .collect()
}

/// Day statuses per phase, phases in plan order.
#[must_use]
pub fn phase_rollup(catalog: &Catalog, ledger: &ProgressLedger) -> Vec<PhaseProgress> {
    catalog
        .phases()
        .into_iter()
        .map(|phase| {
            let mut progress = PhaseProgress {
                phase: phase.to_owned(),
                total_days: 0,
                completed_days: 0,
                in_progress_days: 0,
            };
            for day in catalog.days().iter().filter(|d| d.phase() == phase) {
                progress.total_days += 1;
                match ledger.status(day.day()) {
                    DayStatus::Completed => progress.completed_days += 1,
                    DayStatus::InProgress => progress.in_progress_days += 1,
                    DayStatus::Planned => {}
                }
            }
            progress
        })
        .collect()
}

/// All headline metrics at once.
#[must_use]
pub fn metrics(catalog: &Catalog, ledger: &ProgressLedger, today: NaiveDate) -> Metrics {
    let total_days = catalog.len();
    let completed_days = ledger.count_status(DayStatus::Completed);
    let total_questions = total_questions(catalog);
    let completed_questions = completed_questions(catalog, ledger);

    Metrics {
        total_days,
        completed_days,
        in_progress_days: ledger.count_status(DayStatus::InProgress),
        completion_rate: completion_rate(completed_days, total_days),
        current_streak: current_streak(catalog, ledger, today),
        total_questions,
        completed_questions,
        question_completion_rate: completion_rate(completed_questions, total_questions),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CatalogDay, Resources, TopicQuestions, TopicTotals};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Three days, each with `{easy: 2, medium: 1, hard: 0}`.
    fn three_day_catalog() -> Catalog {
        let days = (1..=3)
            .map(|n| {
                CatalogDay::new(
                    n,
                    "Foundations",
                    vec!["Arrays".into()],
                    vec![TopicQuestions::new("Arrays", DifficultyCounts::new(2, 1, 0))],
                )
            })
            .collect();
        let mut totals = TopicTotals::new();
        totals.insert("Arrays", DifficultyCounts::new(6, 3, 0));
        Catalog::new(days, totals, Resources::new()).unwrap()
    }

    fn seven_day_catalog() -> Catalog {
        let days = (1..=7)
            .map(|n| CatalogDay::new(n, "P", vec![], vec![]))
            .collect();
        Catalog::new(days, TopicTotals::new(), Resources::new()).unwrap()
    }

    #[test]
    fn completion_rate_guards_zero_denominator() {
        assert_eq!(completion_rate(5, 0), 0.0);
        assert_eq!(completion_rate(0, 0), 0.0);
        assert!((completion_rate(1, 3) - 33.333_333).abs() < 1e-4);
    }

    #[test]
    fn total_questions_prefers_topic_table() {
        let catalog = three_day_catalog();
        assert_eq!(total_questions(&catalog), 9);

        let days = catalog.days().to_vec();
        let no_table = Catalog::new(days, TopicTotals::new(), Resources::new()).unwrap();
        assert_eq!(total_questions(&no_table), 9);
    }

    #[test]
    fn scenario_half_way_through_three_days() {
        let days = (1..=3)
            .map(|n| {
                CatalogDay::new(
                    n,
                    "Foundations",
                    vec!["Arrays".into()],
                    vec![TopicQuestions::new("Arrays", DifficultyCounts::new(2, 1, 0))],
                )
            })
            .collect();
        let catalog = Catalog::new(days, TopicTotals::new(), Resources::new()).unwrap();
        let mut ledger = ProgressLedger::new(date(2024, 1, 1));

        ledger.set_question_progress(1, Difficulty::Easy, 2);
        ledger.set_question_progress(1, Difficulty::Medium, 1);
        ledger.set_status(1, DayStatus::Completed);
        ledger.set_question_progress(2, Difficulty::Easy, 0);
        ledger.set_status(2, DayStatus::InProgress);

        let m = metrics(&catalog, &ledger, date(2024, 1, 2));
        assert_eq!(m.total_questions, 9);
        assert_eq!(m.completed_questions, 3);
        assert_eq!(m.completed_days, 1);
        assert_eq!(m.in_progress_days, 1);
        assert!((m.completion_rate - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn scenario_six_question_plan_is_half_done() {
        // Topic table declares 6 questions overall, two per day.
        let days = (1..=3)
            .map(|n| {
                CatalogDay::new(
                    n,
                    "Foundations",
                    vec!["Arrays".into()],
                    vec![TopicQuestions::new("Arrays", DifficultyCounts::new(2, 1, 0))],
                )
            })
            .collect();
        let mut totals = TopicTotals::new();
        totals.insert("Arrays", DifficultyCounts::new(4, 2, 0));
        let catalog = Catalog::new(days, totals, Resources::new()).unwrap();
        let mut ledger = ProgressLedger::new(date(2024, 1, 1));
        ledger.set_question_progress(1, Difficulty::Easy, 2);
        ledger.set_question_progress(1, Difficulty::Medium, 1);
        ledger.set_status(1, DayStatus::Completed);
        ledger.set_status(2, DayStatus::InProgress);

        let m = metrics(&catalog, &ledger, date(2024, 1, 3));
        assert_eq!(m.total_questions, 6);
        assert_eq!(m.completed_questions, 3);
        assert_eq!(m.question_completion_rate, 50.0);
        assert_eq!(m.completed_days, 1);
    }

    #[test]
    fn completed_questions_ignores_days_outside_plan() {
        let catalog = three_day_catalog();
        let mut ledger = ProgressLedger::new(date(2024, 1, 1));
        ledger.set_question_progress(2, Difficulty::Easy, 1);
        ledger.set_question_progress(9, Difficulty::Easy, 5);
        assert_eq!(completed_questions(&catalog, &ledger), 1);
    }

    #[test]
    fn streak_runs_up_to_today() {
        let catalog = seven_day_catalog();
        let mut ledger = ProgressLedger::new(date(2024, 1, 1));
        for day in 1..=3 {
            ledger.set_status(day, DayStatus::Completed);
        }
        // Days 4.. lie in the future.
        assert_eq!(current_streak(&catalog, &ledger, date(2024, 1, 3)), 3);
        // Before the start date nothing is scanned.
        assert_eq!(current_streak(&catalog, &ledger, date(2023, 12, 31)), 0);
    }

    #[test]
    fn streak_resets_when_latest_scanned_day_is_open() {
        let catalog = seven_day_catalog();
        let mut ledger = ProgressLedger::new(date(2024, 1, 1));
        for day in 1..=3 {
            ledger.set_status(day, DayStatus::Completed);
        }
        ledger.set_status(4, DayStatus::InProgress);

        // Day 4's date is 2024-01-04; on or after it the run is broken.
        assert_eq!(current_streak(&catalog, &ledger, date(2024, 1, 4)), 0);
        assert_eq!(current_streak(&catalog, &ledger, date(2024, 1, 6)), 0);
    }

    #[test]
    fn streak_counts_run_after_gap() {
        let catalog = seven_day_catalog();
        let mut ledger = ProgressLedger::new(date(2024, 1, 1));
        ledger.set_status(1, DayStatus::Completed);
        ledger.set_status(3, DayStatus::Completed);
        ledger.set_status(4, DayStatus::Completed);
        assert_eq!(current_streak(&catalog, &ledger, date(2024, 1, 4)), 2);
    }

    #[test]
    fn topic_rollup_caps_credit_per_topic() {
        let days = vec![CatalogDay::new(
            1,
            "Mixed",
            vec!["Arrays".into(), "Strings".into()],
            vec![
                TopicQuestions::new("Arrays", DifficultyCounts::new(2, 1, 0)),
                TopicQuestions::new("Strings", DifficultyCounts::new(1, 0, 1)),
            ],
        )];
        let mut totals = TopicTotals::new();
        totals.insert("Arrays", DifficultyCounts::new(2, 1, 0));
        let catalog = Catalog::new(days, totals, Resources::new()).unwrap();

        let mut ledger = ProgressLedger::new(date(2024, 1, 1));
        ledger.set_question_progress(1, Difficulty::Easy, 2);
        ledger.set_question_progress(1, Difficulty::Hard, 1);

        let rollup = topic_rollup(&catalog, &ledger);
        assert_eq!(rollup.len(), 2);

        let arrays = &rollup[0];
        assert_eq!(arrays.topic, "Arrays");
        assert_eq!(arrays.total, 3);
        assert_eq!(arrays.easy_completed, 2);
        assert_eq!(arrays.hard_completed, 0);
        assert_eq!(arrays.completed, 2);

        // Not in the totals table: denominator comes from the day breakdown.
        let strings = &rollup[1];
        assert_eq!(strings.topic, "Strings");
        assert_eq!(strings.total, 2);
        assert_eq!(strings.easy_completed, 1);
        assert_eq!(strings.hard_completed, 1);
        assert_eq!(strings.completion_rate(), 100.0);
    }

    #[test]
    fn difficulty_and_phase_rollups() {
        let catalog = three_day_catalog();
        let mut ledger = ProgressLedger::new(date(2024, 1, 1));
        ledger.set_question_progress(1, Difficulty::Easy, 2);
        ledger.set_question_progress(3, Difficulty::Medium, 1);
        ledger.set_status(1, DayStatus::Completed);
        ledger.set_status(3, DayStatus::InProgress);

        let by_difficulty = difficulty_rollup(&catalog, &ledger);
        assert_eq!(by_difficulty[0].planned, 6);
        assert_eq!(by_difficulty[0].solved, 2);
        assert_eq!(by_difficulty[1].planned, 3);
        assert_eq!(by_difficulty[1].solved, 1);
        assert_eq!(by_difficulty[2].planned, 0);
        assert_eq!(by_difficulty[2].completion_rate(), 0.0);

        let phases = phase_rollup(&catalog, &ledger);
        assert_eq!(
            phases,
            vec![PhaseProgress {
                phase: "Foundations".into(),
                total_days: 3,
                completed_days: 1,
                in_progress_days: 1,
            }]
        );
    }
}
