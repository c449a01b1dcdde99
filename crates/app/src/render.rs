//! Plain-text rendering of service views.

use std::fmt::Write as _;

use plan_core::model::{DayPosition, Difficulty, DifficultyCounts};
use plan_core::stats::{DifficultyProgress, Metrics, PhaseProgress, TopicProgress};
use services::{DailySummary, DayView, TodayView};

fn counts(solved: DifficultyCounts, totals: DifficultyCounts) -> String {
    Difficulty::ALL
        .iter()
        .map(|d| {
            let tag = d.as_str().chars().next().unwrap_or('?').to_ascii_uppercase();
            format!("{tag} {}/{}", solved.get(*d), totals.get(*d))
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn day(view: &DayView) -> String {
    let mut out = String::new();
    let date = view
        .date
        .map_or_else(|| "----------".to_string(), |d| d.to_string());
    let marker = if view.is_today { " <- today" } else { "" };
    let _ = writeln!(
        out,
        "Day {:>3}  {date}  {:<12} [{}]{marker}",
        view.day, view.phase, view.status
    );
    let _ = writeln!(out, "         topics: {}", view.topics.join(", "));
    let _ = writeln!(out, "         solved: {}", counts(view.solved, view.totals));
    if !view.note.is_empty() {
        let _ = writeln!(out, "         note:   {}", view.note);
    }
    out
}

pub fn plan(views: &[DayView]) -> String {
    if views.is_empty() {
        return "no matching days\n".to_string();
    }
    views.iter().map(day).collect()
}

pub fn today(view: &TodayView) -> String {
    match (&view.position, &view.day) {
        (DayPosition::NotStarted, _) => format!("{}: the plan has not started yet\n", view.date),
        (DayPosition::Finished, _) => format!("{}: challenge complete\n", view.date),
        (DayPosition::Active(_), Some(day_view)) => {
            let mut out = day(day_view);
            let _ = writeln!(out, "         resources:");
            for resource in &day_view.resources {
                let _ = writeln!(out, "           - {resource}");
            }
            out
        }
        (DayPosition::Active(n), None) => format!("{}: day {n}\n", view.date),
    }
}

pub fn metrics(m: &Metrics) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "days:      {}/{} completed ({:.1}%), {} in progress",
        m.completed_days, m.total_days, m.completion_rate, m.in_progress_days
    );
    let _ = writeln!(
        out,
        "questions: {}/{} solved ({:.1}%)",
        m.completed_questions, m.total_questions, m.question_completion_rate
    );
    let _ = writeln!(out, "streak:    {} day(s)", m.current_streak);
    out
}

pub fn breakdown(difficulties: &[DifficultyProgress], phases: &[PhaseProgress]) -> String {
    let mut out = String::new();
    for d in difficulties {
        let _ = writeln!(
            out,
            "{:<8} {:>4}/{:<4} {:>5.1}%",
            d.difficulty,
            d.solved,
            d.planned,
            d.completion_rate()
        );
    }
    for p in phases {
        let _ = writeln!(
            out,
            "{:<20} {}/{} days completed, {} in progress",
            p.phase, p.completed_days, p.total_days, p.in_progress_days
        );
    }
    out
}

pub fn topics(rows: &[TopicProgress]) -> String {
    let mut out = String::new();
    for row in rows {
        let _ = writeln!(
            out,
            "{:<24} {:>4}/{:<4} {:>5.1}%  (E {} M {} H {})",
            row.topic,
            row.completed,
            row.total,
            row.completion_rate(),
            row.easy_completed,
            row.medium_completed,
            row.hard_completed
        );
    }
    out
}

pub fn daily(summary: &DailySummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}: {} question(s) from a pool of {}",
        summary.date_key,
        summary.questions.len(),
        summary.pool_size
    );
    for q in &summary.questions {
        let mark = if q.completed { "x" } else { " " };
        let _ = writeln!(out, "  [{mark}] {}", q.id);
    }
    let _ = writeln!(
        out,
        "completed today: {}, all time: {}",
        summary.completed_today, summary.total_completed
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use plan_core::model::{DayStatus, QuestionId};
    use services::DailyQuestion;

    fn view() -> DayView {
        DayView {
            day: 3,
            phase: "Graphs".into(),
            topics: vec!["BFS".into(), "DFS".into()],
            questions: Vec::new(),
            date: NaiveDate::from_ymd_opt(2024, 1, 3),
            is_today: true,
            status: DayStatus::InProgress,
            totals: DifficultyCounts::new(2, 1, 1),
            solved: DifficultyCounts::new(1, 0, 0),
            note: "revisit cycles".into(),
            resources: vec!["Grid walk drills".into()],
        }
    }

    #[test]
    fn day_lists_counts_and_note() {
        let text = day(&view());
        assert!(text.contains("2024-01-03"));
        assert!(text.contains("[in-progress] <- today"));
        assert!(text.contains("E 1/2  M 0/1  H 0/1"));
        assert!(text.contains("note:   revisit cycles"));
    }

    #[test]
    fn today_reports_boundaries() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let finished = TodayView {
            date,
            position: DayPosition::Finished,
            day: None,
        };
        assert_eq!(today(&finished), "2024-02-01: challenge complete\n");

        let active = TodayView {
            date,
            position: DayPosition::Active(3),
            day: Some(view()),
        };
        assert!(today(&active).contains("- Grid walk drills"));
    }

    #[test]
    fn daily_marks_completed() {
        let summary = DailySummary {
            date_key: "2024-01-01".into(),
            questions: vec![DailyQuestion {
                id: QuestionId::new("Two_Pointers", Difficulty::Easy, 2).unwrap(),
                completed: true,
            }],
            completed_today: 1,
            total_completed: 4,
            pool_size: 12,
        };
        let text = daily(&summary);
        assert!(text.contains("[x] Two_Pointers_easy_2"));
        assert!(text.contains("all time: 4"));
    }
}
