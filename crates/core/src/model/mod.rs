mod catalog;
mod daily;
mod difficulty;
mod ids;
mod ledger;

pub use catalog::{
    Catalog, CatalogDay, CatalogDayRecord, CatalogError, DEFAULT_RESOURCES, Resources,
    TopicQuestions, TopicTotals,
};
pub use daily::DailyLedger;
pub use difficulty::{Difficulty, DifficultyCounts, DifficultyParseError};
pub use ids::{ParseIdError, QuestionId};
pub use ledger::{DayPosition, DayStatus, DayStatusParseError, ProgressLedger};
