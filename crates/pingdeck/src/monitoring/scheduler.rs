use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures::future::join_all;
use thiserror::Error;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval, timeout};
use tracing::{debug, error, info, warn};

use super::checker::Checker;
use super::monitor::UrlMonitor;
use super::types::CheckResult;
use crate::config::UrlSpec;
use crate::store::{ResultStore, Snapshot};

/// Tick period used when no enabled URLs exist at start time
pub const DEFAULT_TICK_SECONDS: u64 = 120;

/// Default bound on how long `stop` waits for the tick loop to wind down
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Lifecycle errors: both are no-op errors, state is never corrupted
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("scheduler is already running")]
    AlreadyRunning,
    #[error("scheduler is not running")]
    NotRunning,
}

/// Handle to a spawned tick loop
struct TickTask {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
    period: Duration,
}

/// Coordinates periodic checking of the active URL monitor set
///
/// State machine with two states, STOPPED and RUNNING. The tick period is
/// fixed at `start` time as the minimum interval among enabled specs;
/// configuration changes take effect through stop-then-start, which the
/// control layer performs on every mutation.
pub struct Scheduler {
    checker: Arc<dyn Checker>,
    store: Arc<dyn ResultStore>,
    monitors: Arc<Mutex<HashMap<String, UrlMonitor>>>,
    task: Mutex<Option<TickTask>>,
    stop_timeout: Duration,
}

impl Scheduler {
    pub fn new(checker: Arc<dyn Checker>, store: Arc<dyn ResultStore>) -> Self {
        Self {
            checker,
            store,
            monitors: Arc::new(Mutex::new(HashMap::new())),
            task: Mutex::new(None),
            stop_timeout: DEFAULT_STOP_TIMEOUT,
        }
    }

    /// Override the bound on how long `stop` waits for the loop to exit
    pub fn with_stop_timeout(mut self, stop_timeout: Duration) -> Self {
        self.stop_timeout = stop_timeout;
        self
    }

    /// Replace the active monitor set, keyed by URL
    ///
    /// Valid in any state; does not start or stop ticking. Monitors whose URL
    /// survives the change keep their previous result, so an unrelated config
    /// edit does not replay an initial-check event for every URL.
    pub async fn reconfigure(&self, specs: Vec<UrlSpec>) {
        let mut monitors = self.monitors.lock().await;
        let mut old = std::mem::take(&mut *monitors);
        for spec in specs {
            let previous = old.remove(&spec.url).and_then(UrlMonitor::into_previous);
            monitors.insert(spec.url.clone(), UrlMonitor::with_previous(spec, previous));
        }
    }

    /// Begin the ticking loop; valid only from STOPPED
    ///
    /// Returns the tick period, computed as the minimum interval among
    /// enabled specs at this moment (120s when none are enabled).
    pub async fn start(&self) -> Result<Duration, SchedulerError> {
        let mut task = self.task.lock().await;
        if task.is_some() {
            return Err(SchedulerError::AlreadyRunning);
        }

        let period = self.tick_period().await;
        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(run_tick_loop(
            Arc::clone(&self.checker),
            Arc::clone(&self.store),
            Arc::clone(&self.monitors),
            period,
            stop_rx,
        ));
        *task = Some(TickTask { stop_tx, handle, period });

        info!("Monitoring started, tick period {}s", period.as_secs());
        Ok(period)
    }

    /// Signal the tick loop to exit and wait for it, bounded by the stop
    /// timeout; valid only from RUNNING
    ///
    /// A loop that outlives the timeout is detached: its stop signal is
    /// already set, so a tick in flight completes but no new tick starts.
    pub async fn stop(&self) -> Result<(), SchedulerError> {
        let mut task = self.task.lock().await;
        let Some(TickTask { stop_tx, handle, period }) = task.take() else {
            return Err(SchedulerError::NotRunning);
        };

        let _ = stop_tx.send(true);
        match timeout(self.stop_timeout, handle).await {
            Ok(_) => info!("Monitoring stopped (tick period was {}s)", period.as_secs()),
            Err(_) => warn!(
                "Monitoring loop did not exit within {:?}, detaching; in-flight checks will \
                 finish on their own",
                self.stop_timeout
            ),
        }
        Ok(())
    }

    pub async fn is_running(&self) -> bool {
        self.task.lock().await.is_some()
    }

    /// Tick period the loop is currently running with, if RUNNING
    pub async fn current_period(&self) -> Option<Duration> {
        self.task.lock().await.as_ref().map(|t| t.period)
    }

    /// Snapshot of each monitor's previous result, keyed by URL
    ///
    /// This is a point-in-time read for dashboard display; it may be up to
    /// one tick stale with respect to checks in flight.
    pub async fn previous_results(&self) -> HashMap<String, Option<CheckResult>> {
        let monitors = self.monitors.lock().await;
        monitors
            .iter()
            .map(|(url, monitor)| (url.clone(), monitor.previous_result().cloned()))
            .collect()
    }

    async fn tick_period(&self) -> Duration {
        let monitors = self.monitors.lock().await;
        let min_interval = monitors
            .values()
            .filter(|m| m.spec().enabled)
            .map(|m| m.spec().interval)
            .min()
            .unwrap_or(DEFAULT_TICK_SECONDS);
        Duration::from_secs(min_interval)
    }
}

/// The background tick loop
///
/// The select wakes immediately when the stop signal flips, even mid-sleep
/// of a long tick period, so `stop` never waits for a tick boundary.
async fn run_tick_loop(
    checker: Arc<dyn Checker>,
    store: Arc<dyn ResultStore>,
    monitors: Arc<Mutex<HashMap<String, UrlMonitor>>>,
    period: Duration,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = stop_rx.changed() => break,
            _ = ticker.tick() => {}
        }

        // Failures inside a tick are logged and never terminate the loop.
        if let Err(e) = run_tick(checker.as_ref(), store.as_ref(), &monitors).await {
            error!("Tick failed: {e:#}");
        }
    }

    debug!("Monitoring loop exited");
}

/// Execute one tick: probe every enabled URL concurrently, feed each result
/// through its monitor, and append one snapshot covering them all
async fn run_tick(
    checker: &dyn Checker,
    store: &dyn ResultStore,
    monitors: &Mutex<HashMap<String, UrlMonitor>>,
) -> Result<()> {
    // Copy the enabled specs out so no lock is held during network calls.
    let targets: Vec<UrlSpec> = {
        let monitors = monitors.lock().await;
        monitors
            .values()
            .filter(|m| m.spec().enabled)
            .map(|m| m.spec().clone())
            .collect()
    };

    let outcomes = join_all(targets.iter().map(|spec| probe_one(checker, spec))).await;

    let mut snapshot = Snapshot::now();
    {
        let mut monitors = monitors.lock().await;
        for (url, result) in outcomes {
            if let Some(monitor) = monitors.get_mut(&url) {
                monitor.observe(result.clone());
            }
            // Failed probes are recorded as null, not omitted, so the
            // dashboard can render gaps explicitly.
            let entry = if result.is_failure() { None } else { Some(result) };
            snapshot.record(url, entry);
        }
    }

    store.append(snapshot).await
}

async fn probe_one(checker: &dyn Checker, spec: &UrlSpec) -> (String, CheckResult) {
    let result = match checker.check(&spec.url).await {
        Ok((latency_ms, status_code)) => CheckResult::success(status_code, latency_ms),
        Err(e) => CheckResult::failure(e.to_string()),
    };
    (spec.url.clone(), result)
}
