use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::monitoring::types::CheckResult;

/// One tick's results across all monitored URLs
///
/// A failed probe is recorded as `None` (serialized as `null`), never
/// omitted, so history queries expose gaps instead of silently thinning out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub results: BTreeMap<String, Option<CheckResult>>,
}

impl Snapshot {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self { timestamp, results: BTreeMap::new() }
    }

    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    pub fn record(&mut self, url: String, result: Option<CheckResult>) {
        self.results.insert(url, result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// A single URL's result at one point in history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimedResult {
    pub timestamp: DateTime<Utc>,
    pub result: Option<CheckResult>,
}
