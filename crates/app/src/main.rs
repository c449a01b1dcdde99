//! plan-tracker: command-line shell over the study plan services.

mod db_url;
mod render;
mod telemetry;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use plan_core::model::{DayPosition, DayStatus, Difficulty, QuestionId};
use services::{AppServices, Clock, PlanFilter};
use tracing::debug;

use crate::db_url::{normalize_sqlite_url, prepare_sqlite_file};

#[derive(Parser)]
#[command(name = "plan-tracker")]
#[command(about = "Track progress through a day-by-day study plan", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding plan.json, topic_totals.json and resources.json
    #[arg(long, global = true, env = "PLAN_TRACKER_DATA", default_value = "data")]
    data_dir: PathBuf,

    /// SQLite database URL or path
    #[arg(
        long,
        global = true,
        env = "PLAN_TRACKER_DB_URL",
        default_value = "sqlite://plan-tracker.sqlite3"
    )]
    db: String,

    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List plan days
    Plan {
        /// Only days in this phase
        #[arg(long)]
        phase: Option<String>,

        /// Only days with this status (planned, in-progress, completed)
        #[arg(long)]
        status: Option<DayStatus>,
    },

    /// Show overall progress, per difficulty and per phase
    Stats,

    /// Show per-topic progress
    Topics,

    /// Show today's plan day
    Today,

    /// Set a day's status
    Status { day: u32, status: DayStatus },

    /// Record how many questions of one difficulty are solved on a day
    Solve {
        day: u32,
        difficulty: Difficulty,
        count: u32,
    },

    /// Replace a day's note
    Note { day: u32, text: String },

    /// Move the plan's start date
    StartDate { date: NaiveDate },

    /// Mark today's plan day as completed
    CompleteToday,

    /// Clear all statuses, progress and notes (the start date is kept)
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Write progress as JSON to a file, or stdout
    Export {
        #[arg(long)]
        path: Option<PathBuf>,

        /// Export the daily question ledger instead
        #[arg(long)]
        daily: bool,
    },

    /// Replace progress with a previously exported JSON file
    Import {
        path: PathBuf,

        /// Import into the daily question ledger instead
        #[arg(long)]
        daily: bool,
    },

    /// Show the daily question set
    Daily {
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Mark a daily question as completed today
    DailyDone { id: QuestionId },

    /// Forget every completion of a daily question
    DailyUndo { id: QuestionId },
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let db_url = normalize_sqlite_url(&cli.db)?;
    prepare_sqlite_file(&db_url)?;

    let clock = cli.today.map_or_else(Clock::default_clock, Clock::fixed);
    debug!(db = %db_url, data = %cli.data_dir.display(), fixed = clock.is_fixed(), "opening");
    let app = AppServices::new_sqlite(&db_url, &cli.data_dir, clock).await?;
    for diagnostic in app.diagnostics() {
        eprintln!("warning: {diagnostic}");
    }

    let tracker = app.tracker();
    let daily = app.daily();

    match cli.command {
        Commands::Plan { phase, status } => {
            let filter = PlanFilter { phase, status };
            print!("{}", render::plan(&tracker.plan(&filter).await?));
        }
        Commands::Stats => {
            print!("{}", render::metrics(&tracker.metrics().await?));
            print!(
                "{}",
                render::breakdown(
                    &tracker.difficulty_rollup().await?,
                    &tracker.phase_rollup().await?
                )
            );
        }
        Commands::Topics => print!("{}", render::topics(&tracker.topic_rollup().await?)),
        Commands::Today => print!("{}", render::today(&tracker.today_view().await?)),
        Commands::Status { day, status } => {
            tracker.set_status(day, status).await?;
            println!("day {day}: {status}");
        }
        Commands::Solve {
            day,
            difficulty,
            count,
        } => {
            tracker.set_question_progress(day, difficulty, count).await?;
            let max = tracker.catalog().total_for(day, difficulty);
            println!("day {day}: {count}/{max} {difficulty} solved");
        }
        Commands::Note { day, text } => {
            tracker.set_note(day, text).await?;
            println!("day {day}: note saved");
        }
        Commands::StartDate { date } => {
            tracker.set_start_date(date).await?;
            println!("plan now starts on {date}");
        }
        Commands::CompleteToday => match tracker.mark_today_completed().await? {
            DayPosition::Active(day) => println!("day {day}: completed"),
            DayPosition::NotStarted => println!("the plan has not started yet"),
            DayPosition::Finished => println!("challenge complete, nothing to mark"),
        },
        Commands::Reset { yes } => {
            if yes {
                tracker.reset().await?;
                println!("progress cleared");
            } else {
                println!("this clears all progress; run again with --yes to confirm");
            }
        }
        Commands::Export { path, daily: dump_daily } => {
            let json = if dump_daily {
                daily.export().await?
            } else {
                tracker.export_progress().await?
            };
            match path {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    println!("exported to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        Commands::Import {
            path,
            daily: into_daily,
        } => {
            let raw = std::fs::read_to_string(&path)?;
            if into_daily {
                daily.import(&raw).await?;
            } else {
                tracker.import_progress(&raw).await?;
            }
            println!("imported {}", path.display());
        }
        Commands::Daily { date } => {
            let summary = match date {
                Some(date) => daily.questions_for(date).await?,
                None => daily.todays_questions().await?,
            };
            print!("{}", render::daily(&summary));
        }
        Commands::DailyDone { id } => {
            if daily.mark_complete(id.clone()).await? {
                println!("{id}: completed");
            } else {
                println!("{id}: already completed today");
            }
        }
        Commands::DailyUndo { id } => {
            if daily.mark_incomplete(&id).await? {
                println!("{id}: marked incomplete");
            } else {
                println!("{id}: was not completed");
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    telemetry::init_tracing();
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_typed_arguments() {
        let cli = Cli::try_parse_from([
            "plan-tracker",
            "--today",
            "2024-03-05",
            "solve",
            "4",
            "medium",
            "2",
        ])
        .unwrap();
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2024, 3, 5));
        assert!(matches!(
            cli.command,
            Commands::Solve {
                day: 4,
                difficulty: Difficulty::Medium,
                count: 2
            }
        ));

        let cli = Cli::try_parse_from(["plan-tracker", "daily-done", "Two_Pointers_hard_3"]).unwrap();
        let Commands::DailyDone { id } = cli.command else {
            panic!("expected daily-done");
        };
        assert_eq!(id.topic(), "Two_Pointers");
    }

    #[test]
    fn rejects_unknown_status() {
        assert!(Cli::try_parse_from(["plan-tracker", "status", "1", "finished"]).is_err());
    }
}
