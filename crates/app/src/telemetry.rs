//! Tracing subscriber for the binary.
//!
//! `PLAN_TRACKER_LOG` holds an `EnvFilter` directive (default `info`). Logs go
//! to stderr so command output on stdout stays clean.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "PLAN_TRACKER_LOG";

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
