/// Monitoring engine module - handles scheduling and execution of URL checks
///
/// This module is responsible for:
/// - Performing HTTP(S) probes with bounded timeouts
/// - Tracking per-URL state and classifying status transitions
/// - Running the shared tick loop that feeds the result store
pub mod checker;
pub mod monitor;
pub mod scheduler;
pub mod types;

pub use checker::{Checker, DEFAULT_PROBE_TIMEOUT_SECONDS, HttpChecker};
pub use monitor::UrlMonitor;
pub use scheduler::{DEFAULT_TICK_SECONDS, Scheduler, SchedulerError};
pub use types::{CheckResult, Transition};
