use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of one probe against a URL
///
/// Immutable once produced. A successful probe carries the HTTP status code
/// and latency; a failed probe (network error, timeout) carries only an error
/// description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// HTTP status code (absent when the probe failed)
    pub status_code: Option<u16>,

    /// Wall-clock latency in milliseconds, rounded to 2 decimal places
    pub response_time_ms: Option<f64>,

    /// Timestamp taken at probe completion
    pub timestamp: DateTime<Utc>,

    /// Error message (if the probe failed)
    pub error: Option<String>,
}

impl CheckResult {
    /// Create a successful result with status code and latency
    pub fn success(status_code: u16, response_time_ms: f64) -> Self {
        Self {
            status_code: Some(status_code),
            response_time_ms: Some(response_time_ms),
            timestamp: Utc::now(),
            error: None,
        }
    }

    /// Create a failed result with an error description
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            status_code: None,
            response_time_ms: None,
            timestamp: Utc::now(),
            error: Some(error.into()),
        }
    }

    /// Whether this result records a failed probe
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Classification of how a new result compares to the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    /// No previous result existed for this URL
    Initial,
    /// Status code differs from the previous result
    Changed,
    /// Status code matches the previous result
    Unchanged,
    /// The new result is a probe failure
    Failed,
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transition::Initial => write!(f, "initial"),
            Transition::Changed => write!(f, "changed"),
            Transition::Unchanged => write!(f, "unchanged"),
            Transition::Failed => write!(f, "failed"),
        }
    }
}
