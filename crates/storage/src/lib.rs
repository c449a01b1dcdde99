#![forbid(unsafe_code)]

pub mod catalog_files;
pub mod repository;
pub mod sqlite;

pub use catalog_files::{CatalogDiagnostic, CatalogLoad, load_catalog};
pub use repository::{DailyRepository, InMemoryRepository, LedgerRepository, Storage, StorageError};
