#![forbid(unsafe_code)]

pub mod app_services;
pub mod daily_service;
pub mod error;
pub mod plan_view;
pub mod tracker_service;

pub use plan_core::Clock;

pub use app_services::AppServices;
pub use daily_service::{DailyQuestion, DailyService, DailySummary};
pub use error::{AppServicesError, DailyError, TrackerError};
pub use plan_view::{DayView, PlanFilter, TodayView};
pub use tracker_service::TrackerService;
