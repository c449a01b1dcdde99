//! Domain model for the study plan tracker: the catalog, the progress
//! ledgers, aggregate statistics and the daily question sampler.

#![forbid(unsafe_code)]

pub mod document;
pub mod error;
pub mod model;
pub mod sampler;
pub mod stats;
pub mod time;

pub use error::Error;
pub use time::Clock;
