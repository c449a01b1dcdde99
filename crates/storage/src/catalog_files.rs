//! Loading the study plan catalog from JSON files.
//!
//! A data directory holds up to three files:
//! - `plan.json`: array of day records,
//! - `topic_totals.json`: topic → `{easy, medium, hard}`,
//! - `resources.json`: topic → list of resource strings.
//!
//! Loading never fails outright. Every problem becomes a [`CatalogDiagnostic`]
//! and the affected part falls back to an empty default, so callers can keep
//! rendering with whatever did load.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use plan_core::model::{
    Catalog, CatalogDay, CatalogDayRecord, CatalogError, DifficultyCounts, Resources, TopicTotals,
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{info, warn};

pub const PLAN_FILE: &str = "plan.json";
pub const TOPIC_TOTALS_FILE: &str = "topic_totals.json";
pub const RESOURCES_FILE: &str = "resources.json";

/// A non-fatal problem found while loading the catalog.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogDiagnostic {
    #[error("{} not found", .path.display())]
    Missing { path: PathBuf },

    #[error("could not read {}: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("could not parse {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("invalid plan: {0}")]
    Invalid(CatalogError),

    #[error("day {day} declares totals {declared:?} but its topics add up to {computed:?}")]
    TotalsMismatch {
        day: u32,
        declared: DifficultyCounts,
        computed: DifficultyCounts,
    },
}

impl CatalogDiagnostic {
    /// True if the diagnostic left the catalog without any days.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        match self {
            CatalogDiagnostic::Missing { path }
            | CatalogDiagnostic::Unreadable { path, .. }
            | CatalogDiagnostic::Malformed { path, .. } => path.ends_with(PLAN_FILE),
            CatalogDiagnostic::Invalid(_) => true,
            CatalogDiagnostic::TotalsMismatch { .. } => false,
        }
    }
}

/// Result of loading a data directory.
#[derive(Debug, Clone, Default)]
pub struct CatalogLoad {
    pub catalog: Catalog,
    pub diagnostics: Vec<CatalogDiagnostic>,
}

impl CatalogLoad {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Load the catalog from `dir`.
#[must_use]
pub fn load_catalog(dir: &Path) -> CatalogLoad {
    let mut diagnostics = Vec::new();

    let topic_totals: TopicTotals =
        read_json(&dir.join(TOPIC_TOTALS_FILE), &mut diagnostics).unwrap_or_default();
    let resources: Resources =
        read_json(&dir.join(RESOURCES_FILE), &mut diagnostics).unwrap_or_default();
    let records: Vec<CatalogDayRecord> =
        read_json(&dir.join(PLAN_FILE), &mut diagnostics).unwrap_or_default();

    let catalog = build_catalog(records, topic_totals, resources, &mut diagnostics);

    for diagnostic in &diagnostics {
        warn!(dir = %dir.display(), %diagnostic, "catalog load problem");
    }
    info!(
        dir = %dir.display(),
        days = catalog.len(),
        topics = catalog.topic_totals().len(),
        "catalog loaded"
    );

    CatalogLoad {
        catalog,
        diagnostics,
    }
}

/// Assemble a catalog from already-parsed parts, recording problems.
///
/// An invalid day sequence yields an empty catalog.
#[must_use]
pub fn build_catalog(
    records: Vec<CatalogDayRecord>,
    topic_totals: TopicTotals,
    resources: Resources,
    diagnostics: &mut Vec<CatalogDiagnostic>,
) -> Catalog {
    let mut days = Vec::with_capacity(records.len());
    for record in records {
        let declared = record.declared_totals();
        let day = CatalogDay::from_record(record, &topic_totals);
        if let Some(declared) = declared {
            if declared != day.totals() {
                diagnostics.push(CatalogDiagnostic::TotalsMismatch {
                    day: day.day(),
                    declared,
                    computed: day.totals(),
                });
            }
        }
        days.push(day);
    }

    match Catalog::new(days, topic_totals, resources) {
        Ok(catalog) => catalog,
        Err(err) => {
            diagnostics.push(CatalogDiagnostic::Invalid(err));
            Catalog::empty()
        }
    }
}

fn read_json<T: DeserializeOwned>(
    path: &Path,
    diagnostics: &mut Vec<CatalogDiagnostic>,
) -> Option<T> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            diagnostics.push(CatalogDiagnostic::Missing {
                path: path.to_path_buf(),
            });
            return None;
        }
        Err(err) => {
            diagnostics.push(CatalogDiagnostic::Unreadable {
                path: path.to_path_buf(),
                reason: err.to_string(),
            });
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            diagnostics.push(CatalogDiagnostic::Malformed {
                path: path.to_path_buf(),
                reason: err.to_string(),
            });
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plan_core::model::Difficulty;

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    const PLAN: &str = r#"[
        {"day": 2, "phase": "Foundations", "topics": ["Strings"]},
        {"day": 1, "phase": "Foundations", "topics": ["Arrays"],
         "questions": [{"topic": "Arrays", "easy": 2, "medium": 1, "hard": 0}],
         "total_easy": 2, "total_medium": 1, "total_hard": 0}
    ]"#;

    #[test]
    fn loads_full_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), PLAN_FILE, PLAN);
        write(
            dir.path(),
            TOPIC_TOTALS_FILE,
            r#"{"Arrays": {"easy": 2, "medium": 1, "hard": 0}, "Strings": {"easy": 1, "medium": 1, "hard": 1}}"#,
        );
        write(dir.path(), RESOURCES_FILE, r#"{"Arrays": ["Prefix sums primer"]}"#);

        let load = load_catalog(dir.path());
        assert!(load.is_clean(), "{:?}", load.diagnostics);
        assert_eq!(load.catalog.len(), 2);
        assert_eq!(load.catalog.total_for(2, Difficulty::Hard), 1);
        assert_eq!(
            load.catalog.resources_for(&["Arrays".into()]),
            vec!["Prefix sums primer"]
        );
    }

    #[test]
    fn missing_directory_yields_empty_catalog_and_diagnostics() {
        let dir = tempfile::tempdir().unwrap();
        let load = load_catalog(&dir.path().join("nope"));
        assert!(load.catalog.is_empty());
        assert_eq!(load.diagnostics.len(), 3);
        assert!(load.diagnostics.iter().any(CatalogDiagnostic::is_blocking));
    }

    #[test]
    fn missing_optional_files_keep_the_plan() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), PLAN_FILE, PLAN);

        let load = load_catalog(dir.path());
        assert_eq!(load.catalog.len(), 2);
        assert_eq!(load.diagnostics.len(), 2);
        assert!(!load.diagnostics.iter().any(CatalogDiagnostic::is_blocking));
        // Day 2 borrows counts from a totals table that did not load.
        assert_eq!(load.catalog.day(2).unwrap().totals().total(), 0);
    }

    #[test]
    fn malformed_plan_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), PLAN_FILE, "[{\"day\": ");
        write(dir.path(), TOPIC_TOTALS_FILE, "{}");
        write(dir.path(), RESOURCES_FILE, "{}");

        let load = load_catalog(dir.path());
        assert!(load.catalog.is_empty());
        assert!(matches!(
            load.diagnostics.as_slice(),
            [CatalogDiagnostic::Malformed { .. }]
        ));
    }

    #[test]
    fn gap_in_days_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            PLAN_FILE,
            r#"[{"day": 1, "phase": "A"}, {"day": 3, "phase": "A"}]"#,
        );
        write(dir.path(), TOPIC_TOTALS_FILE, "{}");
        write(dir.path(), RESOURCES_FILE, "{}");

        let load = load_catalog(dir.path());
        assert!(load.catalog.is_empty());
        assert_eq!(
            load.diagnostics,
            vec![CatalogDiagnostic::Invalid(CatalogError::GapInDays {
                expected: 2,
                found: 3
            })]
        );
    }

    #[test]
    fn declared_totals_mismatch_is_a_warning() {
        let mut diagnostics = Vec::new();
        let record: CatalogDayRecord = serde_json::from_str(
            r#"{"day": 1, "phase": "A", "topics": ["Arrays"],
                "questions": [{"topic": "Arrays", "easy": 1, "medium": 0, "hard": 0}],
                "total_easy": 3}"#,
        )
        .unwrap();
        let catalog = build_catalog(
            vec![record],
            TopicTotals::new(),
            Resources::new(),
            &mut diagnostics,
        );
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.total_for(1, Difficulty::Easy), 1);
        assert!(matches!(
            diagnostics.as_slice(),
            [CatalogDiagnostic::TotalsMismatch { day: 1, .. }]
        ));
    }
}
