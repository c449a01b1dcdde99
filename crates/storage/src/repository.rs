use async_trait::async_trait;
use plan_core::model::{DailyLedger, ProgressLedger};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for the progress ledger.
///
/// The ledger is persisted as one document: `save_ledger` replaces whatever was
/// stored before.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Load the stored ledger.
    ///
    /// Returns `Ok(None)` when nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the ledger cannot be read or decoded.
    async fn load_ledger(&self) -> Result<Option<ProgressLedger>, StorageError>;

    /// Replace the stored ledger.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the ledger cannot be stored.
    async fn save_ledger(&self, ledger: &ProgressLedger) -> Result<(), StorageError>;
}

/// Repository contract for the daily question sampler state.
#[async_trait]
pub trait DailyRepository: Send + Sync {
    /// Load the stored daily ledger, or an empty one if nothing was saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the ledger cannot be read or decoded.
    async fn load_daily(&self) -> Result<DailyLedger, StorageError>;

    /// Replace the stored daily ledger.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the ledger cannot be stored.
    async fn save_daily(&self, daily: &DailyLedger) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    ledger: Arc<Mutex<Option<ProgressLedger>>>,
    daily: Arc<Mutex<DailyLedger>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ledger: Arc::new(Mutex::new(None)),
            daily: Arc::new(Mutex::new(DailyLedger::new())),
        }
    }
}

#[async_trait]
impl LedgerRepository for InMemoryRepository {
    async fn load_ledger(&self) -> Result<Option<ProgressLedger>, StorageError> {
        let guard = self
            .ledger
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_ledger(&self, ledger: &ProgressLedger) -> Result<(), StorageError> {
        let mut guard = self
            .ledger
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(ledger.clone());
        Ok(())
    }
}

#[async_trait]
impl DailyRepository for InMemoryRepository {
    async fn load_daily(&self) -> Result<DailyLedger, StorageError> {
        let guard = self
            .daily
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_daily(&self, daily: &DailyLedger) -> Result<(), StorageError> {
        let mut guard = self
            .daily
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = daily.clone();
        Ok(())
    }
}

/// Aggregates ledger repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub ledgers: Arc<dyn LedgerRepository>,
    pub daily: Arc<dyn DailyRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let ledgers: Arc<dyn LedgerRepository> = Arc::new(repo.clone());
        let daily: Arc<dyn DailyRepository> = Arc::new(repo);
        Self { ledgers, daily }
    }
}
