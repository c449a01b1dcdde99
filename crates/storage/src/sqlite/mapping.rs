use plan_core::model::{DayStatus, QuestionId};

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} out of range: {v}")))
}

pub(crate) fn i64_from_usize(field: &'static str, v: usize) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

/// Stored statuses use the canonical name only; aliases the CLI accepts are rejected.
pub(crate) fn parse_day_status(s: &str) -> Result<DayStatus, StorageError> {
    s.parse::<DayStatus>()
        .ok()
        .filter(|status| status.as_str() == s)
        .ok_or_else(|| StorageError::Serialization(format!("invalid status: {s}")))
}

pub(crate) fn parse_question_id(s: &str) -> Result<QuestionId, StorageError> {
    s.parse::<QuestionId>().map_err(ser)
}
