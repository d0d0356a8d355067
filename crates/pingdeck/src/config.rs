use std::{env, fs, path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Check interval applied when a spec omits one
pub const DEFAULT_INTERVAL_SECONDS: u64 = 120;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFailed(#[source] std::io::Error),
    #[error("failed to write config file: {0}")]
    WriteFailed(#[source] std::io::Error),
    #[error("failed to parse config file: {0}")]
    ParseFailed(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    SerializeFailed(#[from] toml::ser::Error),
    #[error("no usable config directory")]
    ConfigPathUnavailable,
}

/// One monitored URL: identity key is `url`, unique within a config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlSpec {
    pub url: String,
    #[serde(default = "default_interval")]
    pub interval: u64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_SECONDS
}

fn default_enabled() -> bool {
    true
}

/// Persisted monitoring configuration: the global monitoring switch plus the
/// URL list
///
/// `enabled` is declared first so the TOML rendering keeps top-level values
/// ahead of the `[[urls]]` tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawConfig")]
pub struct Config {
    pub enabled: bool,
    pub urls: Vec<UrlSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: false,
            urls: vec![UrlSpec {
                url: "https://example.com".into(),
                interval: DEFAULT_INTERVAL_SECONDS,
                enabled: true,
            }],
        }
    }
}

/// On-disk shape, including the legacy single-URL layout
///
/// Old installs persisted `target_url`/`check_interval`; those load as a
/// one-entry URL list without requiring the old keys to survive a save.
#[derive(Deserialize)]
struct RawConfig {
    urls: Option<Vec<UrlSpec>>,
    enabled: Option<bool>,
    target_url: Option<String>,
    check_interval: Option<u64>,
}

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        let urls = match (raw.urls, raw.target_url) {
            (Some(urls), _) => urls,
            (None, Some(target_url)) => vec![UrlSpec {
                url: target_url,
                interval: raw.check_interval.unwrap_or(DEFAULT_INTERVAL_SECONDS),
                enabled: true,
            }],
            (None, None) => Config::default().urls,
        };

        Self { enabled: raw.enabled.unwrap_or(false), urls }
    }
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/pingdeck/config.toml or
/// $HOME/.config/...)
fn default_config_path() -> Result<path::PathBuf, ConfigError> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(ConfigError::ConfigPathUnavailable);
    };

    Ok(path.join("pingdeck/config.toml"))
}

/// Default data directory for the results history and event log
/// ($XDG_DATA_HOME/pingdeck or $HOME/.local/share/pingdeck)
pub fn default_data_dir() -> Result<path::PathBuf, ConfigError> {
    let path = if let Ok(data_home) = env::var("XDG_DATA_HOME") {
        path::PathBuf::from(data_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".local/share")
    } else {
        return Err(ConfigError::ConfigPathUnavailable);
    };

    Ok(path.join("pingdeck"))
}

/// Resolve the config file location: the given path (normalized to .toml)
/// or the default one
pub fn resolve_path(
    optional_path: Option<impl AsRef<path::Path>>,
) -> Result<path::PathBuf, ConfigError> {
    match optional_path {
        Some(path) => Ok(normalize_toml_path(path.as_ref())),
        None => default_config_path(),
    }
}

impl Config {
    /// Generate Config structure from file
    ///
    /// Creates a default config at the resolved path if one does not exist.
    pub fn from_config(optional_path: Option<impl AsRef<path::Path>>) -> Result<Self, ConfigError> {
        let config_path = resolve_path(optional_path)?;

        if config_path.exists() {
            let raw_string = fs::read_to_string(&config_path).map_err(ConfigError::ReadFailed)?;
            Ok(toml::from_str(raw_string.as_str())?)
        } else {
            let config = Self::default();
            config.write_config(&config_path)?;
            Ok(config)
        }
    }

    /// Serialize and write a config to a file
    pub fn write_config(&self, path: &path::Path) -> Result<(), ConfigError> {
        let config_str: String = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::WriteFailed)?;
        }

        fs::write(path, config_str).map_err(ConfigError::WriteFailed)
    }
}
