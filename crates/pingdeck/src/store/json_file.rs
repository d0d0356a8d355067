use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::warn;

use super::snapshot::{Snapshot, TimedResult};
use super::ResultStore;

/// Flat-file store for snapshot history
///
/// Keeps the retained snapshots in memory behind a read-write lock and
/// rewrites one human-readable JSON file on every append. Writes happen once
/// per tick, so the whole-file rewrite stays cheap; the vector is updated
/// and published under the write lock, then persisted outside it so queries
/// never wait on file IO.
pub struct JsonFileStore {
    path: PathBuf,
    cap: usize,
    snapshots: RwLock<Vec<Snapshot>>,
}

impl JsonFileStore {
    /// Open the store, loading existing history from `path`
    ///
    /// A missing file is a fresh store. A corrupt or unreadable file is
    /// logged and treated as empty: history is best-effort and must never
    /// block monitoring from proceeding.
    pub async fn load(path: impl Into<PathBuf>, cap: usize) -> Self {
        let path = path.into();
        let mut snapshots = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<Vec<Snapshot>>(&bytes) {
                Ok(snapshots) => snapshots,
                Err(e) => {
                    warn!("Results file {} is corrupt, starting empty: {e}", path.display());
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!("Could not read results file {}, starting empty: {e}", path.display());
                Vec::new()
            }
        };

        // Order by timestamp key, tolerating files persisted out of order.
        snapshots.sort_by_key(|s| s.timestamp);
        if snapshots.len() > cap {
            let excess = snapshots.len() - cap;
            snapshots.drain(..excess);
        }

        Self { path, cap, snapshots: RwLock::new(snapshots) }
    }

    async fn persist(&self, snapshots: &[Snapshot]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_vec_pretty(snapshots)?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl ResultStore for JsonFileStore {
    async fn append(&self, snapshot: Snapshot) -> Result<()> {
        let published = {
            let mut snapshots = self.snapshots.write().await;
            snapshots.push(snapshot);
            snapshots.sort_by_key(|s| s.timestamp);
            if snapshots.len() > self.cap {
                let excess = snapshots.len() - self.cap;
                snapshots.drain(..excess);
            }
            snapshots.clone()
        };

        self.persist(&published).await
    }

    async fn query(&self, since: DateTime<Utc>) -> Result<HashMap<String, Vec<TimedResult>>> {
        let snapshots = self.snapshots.read().await;
        let mut history: HashMap<String, Vec<TimedResult>> = HashMap::new();

        for snapshot in snapshots.iter().filter(|s| s.timestamp >= since) {
            for (url, result) in &snapshot.results {
                history.entry(url.clone()).or_default().push(TimedResult {
                    timestamp: snapshot.timestamp,
                    result: result.clone(),
                });
            }
        }

        Ok(history)
    }

    async fn len(&self) -> usize {
        self.snapshots.read().await.len()
    }
}
