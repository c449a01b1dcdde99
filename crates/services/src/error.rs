//! Shared error types for the services crate.

use thiserror::Error;

use plan_core::document::DocumentError;
use plan_core::model::Difficulty;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `TrackerService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TrackerError {
    #[error("day {day} is not part of the {plan_len}-day plan")]
    UnknownDay { day: u32, plan_len: u32 },
    #[error("imported progress records day 0; plan days start at 1")]
    ZeroDayInDocument,
    #[error("day {day} has {max} {difficulty} questions; cannot record {count} solved")]
    CountOutOfRange {
        day: u32,
        difficulty: Difficulty,
        count: u32,
        max: u32,
    },
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `DailyService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DailyError {
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
