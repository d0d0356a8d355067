//! Control facade - the operations the web layer consumes.
//!
//! Owns the configuration location and the scheduler/store handles, replacing
//! ambient globals with one coordinator that has an explicit lifecycle. Every
//! configuration mutation follows the same flow: validate, persist the config
//! file, stop the scheduler if running, rebuild the monitor set, then start
//! again if monitoring is enabled. The tick period is recomputed by that
//! restart and only by it.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{Config, UrlSpec};
use crate::monitoring::types::CheckResult;
use crate::monitoring::Scheduler;
use crate::store::ResultStore;
use crate::validation::validate_spec;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("URL cannot be empty")]
    EmptyUrl,
    #[error("URL not found: {0}")]
    UrlNotFound(String),
    #[error("URL already exists: {0}")]
    UrlAlreadyExists(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
    #[error("history query failed: {0}")]
    Store(#[from] anyhow::Error),
}

impl ControlError {
    /// Stable reason code surfaced to API clients
    pub fn code(&self) -> &'static str {
        match self {
            ControlError::EmptyUrl => "EMPTY_URL",
            ControlError::UrlNotFound(_) => "URL_NOT_FOUND",
            ControlError::UrlAlreadyExists(_) => "URL_ALREADY_EXISTS",
            ControlError::InvalidInput(_) => "INVALID_INPUT",
            ControlError::Config(_) => "CONFIG_IO",
            ControlError::Store(_) => "STORE_IO",
        }
    }
}

/// Scheduler state plus the configuration backing it
#[derive(Debug, Serialize)]
pub struct Status {
    pub running: bool,
    pub config: Config,
}

/// Dashboard view of one URL: last result and its monitoring settings
#[derive(Debug, Serialize)]
pub struct UrlStatus {
    pub previous_result: Option<CheckResult>,
    pub enabled: bool,
    pub interval: u64,
}

/// Chart-ready series for one URL; null entries mark failed probes so the
/// dashboard renders gaps instead of interpolating over them
#[derive(Debug, Default, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub response_times: Vec<Option<f64>>,
    pub status_codes: Vec<Option<u16>>,
}

pub struct Control {
    config_path: PathBuf,
    scheduler: Arc<Scheduler>,
    store: Arc<dyn ResultStore>,
}

impl Control {
    pub fn new(config_path: PathBuf, scheduler: Arc<Scheduler>, store: Arc<dyn ResultStore>) -> Self {
        Self { config_path, scheduler, store }
    }

    /// Load the persisted configuration (creating the default on first use)
    pub fn load_config(&self) -> Result<Config, ControlError> {
        Ok(Config::from_config(Some(&self.config_path))?)
    }

    /// Bring the scheduler in line with the persisted config at boot
    pub async fn resume(&self) -> Result<(), ControlError> {
        let config = self.load_config()?;
        self.scheduler.reconfigure(config.urls.clone()).await;
        if config.enabled {
            match self.scheduler.start().await {
                Ok(period) => info!("Resumed monitoring, tick period {}s", period.as_secs()),
                Err(e) => warn!("Could not resume monitoring: {e}"),
            }
        }
        Ok(())
    }

    pub async fn status(&self) -> Result<Status, ControlError> {
        Ok(Status { running: self.scheduler.is_running().await, config: self.load_config()? })
    }

    /// Per-URL `{previous_result, enabled, interval}` for every configured URL
    pub async fn current_status(&self) -> Result<BTreeMap<String, UrlStatus>, ControlError> {
        let config = self.load_config()?;
        let mut previous = self.scheduler.previous_results().await;

        Ok(config
            .urls
            .into_iter()
            .map(|spec| {
                let previous_result = previous.remove(&spec.url).flatten();
                (spec.url, UrlStatus { previous_result, enabled: spec.enabled, interval: spec.interval })
            })
            .collect())
    }

    /// Chart series per URL covering the last `hours` hours
    pub async fn results(&self, hours: u32) -> Result<BTreeMap<String, ChartSeries>, ControlError> {
        let since = Utc::now() - TimeDelta::hours(i64::from(hours));
        let history = self.store.query(since).await?;

        let mut charts = BTreeMap::new();
        for (url, entries) in history {
            let mut series = ChartSeries::default();
            for entry in entries {
                series.labels.push(entry.timestamp.format("%H:%M").to_string());
                match entry.result {
                    Some(result) => {
                        series.response_times.push(result.response_time_ms);
                        series.status_codes.push(result.status_code);
                    }
                    None => {
                        series.response_times.push(None);
                        series.status_codes.push(None);
                    }
                }
            }
            charts.insert(url, series);
        }
        Ok(charts)
    }

    /// Add one URL; fails if the URL is already configured
    ///
    /// Returns the updated config and the index of the new entry.
    pub async fn add_url(&self, spec: UrlSpec) -> Result<(Config, usize), ControlError> {
        validate_spec(&spec)?;

        let mut config = self.load_config()?;
        if config.urls.iter().any(|u| u.url == spec.url) {
            return Err(ControlError::UrlAlreadyExists(spec.url));
        }

        config.urls.push(spec);
        let index = config.urls.len() - 1;
        self.apply(&config).await?;
        Ok((config, index))
    }

    /// Update the spec stored under `original_url` (possibly renaming it)
    pub async fn update_url(&self, original_url: &str, spec: UrlSpec) -> Result<Config, ControlError> {
        validate_spec(&spec)?;

        let mut config = self.load_config()?;
        if spec.url != original_url && config.urls.iter().any(|u| u.url == spec.url) {
            return Err(ControlError::UrlAlreadyExists(spec.url));
        }

        let entry = config
            .urls
            .iter_mut()
            .find(|u| u.url == original_url)
            .ok_or_else(|| ControlError::UrlNotFound(original_url.to_string()))?;
        *entry = spec;

        self.apply(&config).await?;
        Ok(config)
    }

    pub async fn remove_url(&self, url: &str) -> Result<Config, ControlError> {
        let mut config = self.load_config()?;
        let before = config.urls.len();
        config.urls.retain(|u| u.url != url);
        if config.urls.len() == before {
            return Err(ControlError::UrlNotFound(url.to_string()));
        }

        self.apply(&config).await?;
        Ok(config)
    }

    /// Bulk-replace the whole configuration
    ///
    /// Entries with a blank URL are dropped rather than rejected, matching
    /// how empty form rows have always been treated.
    pub async fn replace_config(&self, mut config: Config) -> Result<Config, ControlError> {
        config.urls.retain(|u| !u.url.trim().is_empty());

        let mut seen = HashSet::new();
        for spec in &config.urls {
            validate_spec(spec)?;
            if !seen.insert(spec.url.as_str()) {
                return Err(ControlError::UrlAlreadyExists(spec.url.clone()));
            }
        }

        self.apply(&config).await?;
        Ok(config)
    }

    /// Persist `config`, then restart monitoring so it takes effect
    async fn apply(&self, config: &Config) -> Result<(), ControlError> {
        config.write_config(&self.config_path)?;

        if self.scheduler.is_running().await {
            if let Err(e) = self.scheduler.stop().await {
                // Lost a race with another mutation's stop; nothing to undo.
                warn!("Stop during reconfiguration reported: {e}");
            }
        }

        self.scheduler.reconfigure(config.urls.clone()).await;

        if config.enabled {
            match self.scheduler.start().await {
                Ok(period) => info!("Monitoring restarted, tick period {}s", period.as_secs()),
                Err(e) => warn!("Start during reconfiguration reported: {e}"),
            }
        }

        Ok(())
    }
}
