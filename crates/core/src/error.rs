use thiserror::Error;

use crate::document::DocumentError;
use crate::model::{CatalogError, DayStatusParseError, DifficultyParseError, ParseIdError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    QuestionId(#[from] ParseIdError),
    #[error(transparent)]
    Difficulty(#[from] DifficultyParseError),
    #[error(transparent)]
    DayStatus(#[from] DayStatusParseError),
}
