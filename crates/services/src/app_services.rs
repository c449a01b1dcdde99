use std::path::Path;
use std::sync::Arc;

use plan_core::model::Catalog;
use storage::catalog_files::{CatalogDiagnostic, load_catalog};
use storage::repository::Storage;

use crate::Clock;
use crate::daily_service::DailyService;
use crate::error::AppServicesError;
use crate::tracker_service::TrackerService;

/// Assembles the tracker and daily services over one catalog and one storage.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<Catalog>,
    diagnostics: Vec<CatalogDiagnostic>,
    tracker: Arc<TrackerService>,
    daily: Arc<DailyService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the catalog in `data_dir`.
    ///
    /// Catalog problems do not fail construction; they are kept in
    /// [`AppServices::diagnostics`].
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        data_dir: &Path,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let load = load_catalog(data_dir);
        Ok(Self::assemble(load.catalog, load.diagnostics, &storage, clock))
    }

    /// Build services over an already-loaded catalog and in-memory storage.
    #[must_use]
    pub fn in_memory(catalog: Catalog, clock: Clock) -> Self {
        Self::assemble(catalog, Vec::new(), &Storage::in_memory(), clock)
    }

    fn assemble(
        catalog: Catalog,
        diagnostics: Vec<CatalogDiagnostic>,
        storage: &Storage,
        clock: Clock,
    ) -> Self {
        let catalog = Arc::new(catalog);
        let tracker = Arc::new(TrackerService::new(
            clock,
            Arc::clone(&catalog),
            Arc::clone(&storage.ledgers),
        ));
        let daily = Arc::new(DailyService::new(
            clock,
            &catalog,
            Arc::clone(&storage.daily),
        ));
        Self {
            catalog,
            diagnostics,
            tracker,
            daily,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[CatalogDiagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn tracker(&self) -> Arc<TrackerService> {
        Arc::clone(&self.tracker)
    }

    #[must_use]
    pub fn daily(&self) -> Arc<DailyService> {
        Arc::clone(&self.daily)
    }
}
