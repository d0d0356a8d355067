//! Pingdeck - multi-URL HTTP monitoring engine
//!
//! This library provides the monitoring core behind the Pingdeck dashboard:
//! a scheduler that probes a set of URLs on a shared tick, per-URL state
//! machines that classify status transitions, and a bounded result store
//! that backs time-windowed history queries.

pub mod config;
pub mod control;
pub mod monitoring;
pub mod store;
pub mod validation;

// Re-export main types
pub use config::{Config, UrlSpec};
pub use control::{Control, ControlError};
pub use monitoring::{CheckResult, Checker, HttpChecker, Scheduler, SchedulerError, Transition};
pub use store::{JsonFileStore, ResultStore, Snapshot};

/// Re-export common error types
pub use anyhow;

/// Pingdeck result type using anyhow for error handling
pub type Result<T> = anyhow::Result<T>;
