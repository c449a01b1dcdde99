//! JSON export / import of persisted documents.
//!
//! Export is a verbatim pretty-printed dump. Import only checks that the text
//! parses into the document shape; callers replace their state wholesale on
//! success and keep it untouched on error.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DocumentError {
    #[error("malformed progress document: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("could not encode progress document: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Serialize a document for export.
///
/// # Errors
///
/// Returns `DocumentError::Encode` if serialization fails.
pub fn export<T: Serialize>(document: &T) -> Result<String, DocumentError> {
    serde_json::to_string_pretty(document).map_err(DocumentError::Encode)
}

/// Parse an exported document.
///
/// # Errors
///
/// Returns `DocumentError::Malformed` if `raw` is not a valid document.
pub fn import<T: DeserializeOwned>(raw: &str) -> Result<T, DocumentError> {
    serde_json::from_str(raw).map_err(DocumentError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DailyLedger, DayStatus, Difficulty, ProgressLedger, QuestionId};
    use crate::time::fixed_today;

    #[test]
    fn ledger_export_import_is_identity() {
        let mut ledger = ProgressLedger::new(fixed_today());
        ledger.set_status(1, DayStatus::Completed);
        ledger.set_status(2, DayStatus::InProgress);
        ledger.set_question_progress(1, Difficulty::Easy, 2);
        ledger.set_question_progress(2, Difficulty::Hard, 1);
        ledger.set_note(2, "revisit sliding window");

        let dumped = export(&ledger).unwrap();
        let restored: ProgressLedger = import(&dumped).unwrap();
        assert_eq!(restored, ledger);
    }

    #[test]
    fn ledger_document_shape() {
        let mut ledger = ProgressLedger::new(fixed_today());
        ledger.set_status(3, DayStatus::InProgress);
        ledger.set_question_progress(3, Difficulty::Medium, 1);

        let value: serde_json::Value = serde_json::from_str(&export(&ledger).unwrap()).unwrap();
        assert_eq!(value["start_date"], "2024-01-01");
        assert_eq!(value["status"]["3"], "in-progress");
        assert_eq!(value["question_progress"]["3"]["medium"], 1);
        assert!(value["notes"].as_object().unwrap().is_empty());
    }

    #[test]
    fn daily_export_import_is_identity() {
        let mut daily = DailyLedger::new();
        let pool = vec![
            QuestionId::new("Arrays", Difficulty::Easy, 1).unwrap(),
            QuestionId::new("Arrays", Difficulty::Easy, 2).unwrap(),
        ];
        daily.questions_for("2024-01-01", &pool);
        daily.mark_complete(pool[1].clone(), "2024-01-01");

        let restored: DailyLedger = import(&export(&daily).unwrap()).unwrap();
        assert_eq!(restored, daily);
    }

    #[test]
    fn malformed_documents_are_rejected() {
        assert!(matches!(
            import::<ProgressLedger>("{not json"),
            Err(DocumentError::Malformed(_))
        ));
        assert!(import::<ProgressLedger>(r#"{"status": {}}"#).is_err());
        assert!(
            import::<ProgressLedger>(r#"{"start_date": "2024-01-01", "status": {"1": "skipped"}}"#)
                .is_err()
        );
        assert!(import::<DailyLedger>(r#"{"completed": {"2024-01-01": ["nope"]}}"#).is_err());
    }

    #[test]
    fn minimal_document_imports_with_defaults() {
        let ledger: ProgressLedger = import(r#"{"start_date": "2024-05-01"}"#).unwrap();
        assert_eq!(ledger.statuses().count(), 0);
        assert_eq!(ledger.start_date().to_string(), "2024-05-01");
    }
}
