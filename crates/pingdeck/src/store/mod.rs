/// Result history storage
///
/// This module provides a unified interface over snapshot history, so the
/// backing storage (flat JSON file today) is swappable without touching the
/// scheduler.
pub mod json_file;
pub mod snapshot;

pub use json_file::JsonFileStore;
pub use snapshot::{Snapshot, TimedResult};

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Default maximum number of retained snapshots
pub const DEFAULT_RETENTION: usize = 1000;

/// Storage abstraction for the bounded snapshot history
///
/// Appends are serialized (one writer, the tick loop); queries may run
/// concurrently and tolerate being one tick stale. History is best-effort:
/// implementations log storage failures rather than letting them stop
/// monitoring.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Append one snapshot, evicting the chronologically oldest entries once
    /// the retention cap is exceeded
    async fn append(&self, snapshot: Snapshot) -> Result<()>;

    /// Per-URL history with timestamp >= `since`, in chronological order,
    /// for every URL appearing in any retained snapshot
    async fn query(&self, since: DateTime<Utc>) -> Result<HashMap<String, Vec<TimedResult>>>;

    /// Number of retained snapshots
    async fn len(&self) -> usize;
}
