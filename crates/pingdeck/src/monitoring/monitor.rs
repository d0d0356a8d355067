use tracing::{error, info, warn};

use super::types::{CheckResult, Transition};
use crate::config::UrlSpec;

/// Per-URL monitoring state machine
///
/// Owns one URL's spec and the previous probe result, classifies each new
/// result against it, and emits one event-log line per check. Callers hold
/// the monitor-set lock across `observe`, which makes the compare-and-store
/// atomic with respect to concurrent status reads. Probing itself happens
/// elsewhere, outside any lock.
#[derive(Debug)]
pub struct UrlMonitor {
    spec: UrlSpec,
    previous: Option<CheckResult>,
}

impl UrlMonitor {
    pub fn new(spec: UrlSpec) -> Self {
        Self { spec, previous: None }
    }

    /// Rebuild a monitor around a new spec, carrying over earlier state
    pub fn with_previous(spec: UrlSpec, previous: Option<CheckResult>) -> Self {
        Self { spec, previous }
    }

    pub fn spec(&self) -> &UrlSpec {
        &self.spec
    }

    pub fn previous_result(&self) -> Option<&CheckResult> {
        self.previous.as_ref()
    }

    pub fn into_previous(self) -> Option<CheckResult> {
        self.previous
    }

    /// Classify `current` against the stored previous result
    ///
    /// A probe failure is FAILED regardless of history. Otherwise the status
    /// code decides: no history is INITIAL, a differing code is CHANGED, the
    /// same code is UNCHANGED. A previous failure has no status code, so
    /// recovery from failure classifies as CHANGED.
    fn classify(&self, current: &CheckResult) -> Transition {
        if current.is_failure() {
            return Transition::Failed;
        }
        match &self.previous {
            None => Transition::Initial,
            Some(previous) if previous.status_code != current.status_code => Transition::Changed,
            Some(_) => Transition::Unchanged,
        }
    }

    /// Record a completed check: classify the transition, emit the event,
    /// then overwrite the previous result
    ///
    /// A failed check still overwrites the previous result (with its status
    /// absent), so a repeat failure is distinguishable from a URL that has
    /// never been checked.
    pub fn observe(&mut self, current: CheckResult) -> Transition {
        let transition = self.classify(&current);
        self.log_transition(&current, transition);
        self.previous = Some(current);
        transition
    }

    fn log_transition(&self, current: &CheckResult, transition: Transition) {
        let url = &self.spec.url;
        let latency = current.response_time_ms.unwrap_or_default();
        let status = fmt_status(current.status_code);

        match transition {
            Transition::Initial => {
                info!("Initial status check for {url}: {status} ({latency} ms)");
            }
            Transition::Changed => {
                let old = fmt_status(self.previous.as_ref().and_then(|p| p.status_code));
                warn!("Status changed for {url} from {old} to {status} ({latency} ms)");
            }
            Transition::Unchanged => {
                info!("Status unchanged for {url}: {status} ({latency} ms)");
            }
            Transition::Failed => {
                let reason = current.error.as_deref().unwrap_or("unknown error");
                error!("Check failed for {url}: {reason}");
            }
        }
    }
}

fn fmt_status(code: Option<u16>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}
