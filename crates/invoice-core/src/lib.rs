//! Invoice Core - business logic shared by every front end.
//!
//! - **clock**: day boundaries in the fixed reporting timezone
//! - **config**: environment-supplied settings, validated at startup
//! - **lifecycle**: create/resolve/delete transitions over an [`InvoiceStore`]
//! - **report**: per-contributor daily statistics
//! - **schedule**: once-per-day job runner firing at local midnight
//!
//! [`InvoiceStore`]: invoice_store::InvoiceStore

pub mod clock;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod report;
pub mod schedule;

pub use clock::ReportClock;
pub use config::{BotConfig, ConfigError, DEFAULT_RESOLVE_MARKERS};
pub use error::{InvoiceError, Result};
pub use lifecycle::{AddOutcome, LifecycleManager};
pub use report::{CategoryCounts, DailyReport, EmployeeStats, ReportAggregator};
pub use schedule::{run_daily, DailyJob, DailySchedule};
