//! End-to-end tests for the control facade
//!
//! These drive the same operations the web layer calls, over real config and
//! results files in temp directories, with a scripted checker so nothing
//! touches the network.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use pingdeck::config::{Config, UrlSpec};
use pingdeck::control::{Control, ControlError};
use pingdeck::monitoring::{Checker, Scheduler};
use pingdeck::store::{JsonFileStore, ResultStore, Snapshot};
use pingdeck::CheckResult;

struct ScriptedChecker;

#[async_trait::async_trait]
impl Checker for ScriptedChecker {
    async fn check(&self, target: &str) -> anyhow::Result<(f64, u16)> {
        if target.contains("down") {
            Err(anyhow::anyhow!("connection refused"))
        } else {
            Ok((7.5, 200))
        }
    }
}

struct Fixture {
    control: Control,
    scheduler: Arc<Scheduler>,
    store: Arc<JsonFileStore>,
    config_path: PathBuf,
    _dir: tempfile::TempDir,
}

async fn fixture() -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("config.toml");
    let store = Arc::new(JsonFileStore::load(dir.path().join("results.json"), 1000).await);
    let scheduler = Arc::new(
        Scheduler::new(Arc::new(ScriptedChecker), store.clone())
            .with_stop_timeout(Duration::from_secs(1)),
    );
    let control = Control::new(config_path.clone(), scheduler.clone(), store.clone());
    Fixture { control, scheduler, store, config_path, _dir: dir }
}

fn spec(url: &str, interval: u64, enabled: bool) -> UrlSpec {
    UrlSpec { url: url.to_string(), interval, enabled }
}

#[tokio::test]
async fn first_load_creates_default_config() {
    let fx = fixture().await;
    let config = fx.control.load_config().expect("load");
    assert!(!config.enabled);
    assert_eq!(config.urls.len(), 1);
    assert!(fx.config_path.exists());
}

#[tokio::test]
async fn add_url_persists_and_reports_index() {
    let fx = fixture().await;
    let (config, index) = fx
        .control
        .add_url(spec("https://a.example", 60, true))
        .await
        .expect("add");

    assert_eq!(index, config.urls.len() - 1);
    assert!(config.urls.iter().any(|u| u.url == "https://a.example"));

    // A fresh load sees the persisted change.
    let reloaded = fx.control.load_config().expect("reload");
    assert_eq!(reloaded, config);
}

#[tokio::test]
async fn duplicate_add_fails_and_leaves_stored_config_unchanged() {
    let fx = fixture().await;
    fx.control.add_url(spec("https://a.example", 60, true)).await.expect("add");
    let stored_before = std::fs::read_to_string(&fx.config_path).expect("read");

    let err = fx
        .control
        .add_url(spec("https://a.example", 30, false))
        .await
        .expect_err("duplicate must fail");
    assert!(matches!(err, ControlError::UrlAlreadyExists(_)));
    assert_eq!(err.code(), "URL_ALREADY_EXISTS");

    let stored_after = std::fs::read_to_string(&fx.config_path).expect("read");
    assert_eq!(stored_before, stored_after);
}

#[tokio::test]
async fn update_url_renames_and_rejects_unknown() {
    let fx = fixture().await;
    fx.control.add_url(spec("https://a.example", 60, true)).await.expect("add");

    let config = fx
        .control
        .update_url("https://a.example", spec("https://b.example", 30, false))
        .await
        .expect("update");
    assert!(config.urls.iter().any(|u| u.url == "https://b.example" && u.interval == 30));
    assert!(!config.urls.iter().any(|u| u.url == "https://a.example"));

    let err = fx
        .control
        .update_url("https://missing.example", spec("https://c.example", 60, true))
        .await
        .expect_err("unknown original URL");
    assert_eq!(err.code(), "URL_NOT_FOUND");
}

#[tokio::test]
async fn remove_url_deletes_and_rejects_unknown() {
    let fx = fixture().await;
    fx.control.add_url(spec("https://a.example", 60, true)).await.expect("add");

    let config = fx.control.remove_url("https://a.example").await.expect("remove");
    assert!(!config.urls.iter().any(|u| u.url == "https://a.example"));

    let err = fx.control.remove_url("https://a.example").await.expect_err("already gone");
    assert_eq!(err.code(), "URL_NOT_FOUND");
}

#[tokio::test]
async fn replace_config_skips_blank_urls_and_rejects_duplicates() {
    let fx = fixture().await;

    let replaced = fx
        .control
        .replace_config(Config {
            urls: vec![
                spec("https://a.example", 60, true),
                spec("   ", 60, true),
                spec("https://b.example", 120, false),
            ],
            enabled: false,
        })
        .await
        .expect("replace");
    assert_eq!(replaced.urls.len(), 2, "blank rows are dropped");

    let err = fx
        .control
        .replace_config(Config {
            urls: vec![spec("https://a.example", 60, true), spec("https://a.example", 30, true)],
            enabled: false,
        })
        .await
        .expect_err("duplicates rejected");
    assert_eq!(err.code(), "URL_ALREADY_EXISTS");
}

#[tokio::test]
async fn validation_errors_carry_reason_codes() {
    let fx = fixture().await;

    let err = fx.control.add_url(spec("", 60, true)).await.expect_err("empty");
    assert_eq!(err.code(), "EMPTY_URL");

    let err = fx.control.add_url(spec("ftp://a.example", 60, true)).await.expect_err("scheme");
    assert_eq!(err.code(), "INVALID_INPUT");

    let err = fx.control.add_url(spec("https://a.example", 0, true)).await.expect_err("interval");
    assert_eq!(err.code(), "INVALID_INPUT");
}

#[tokio::test]
async fn enabling_config_starts_monitoring_and_disabling_stops_it() {
    let fx = fixture().await;

    let config = Config { urls: vec![spec("https://a.example", 60, true)], enabled: true };
    fx.control.replace_config(config.clone()).await.expect("replace");
    assert!(fx.control.status().await.expect("status").running);

    fx.control
        .replace_config(Config { enabled: false, ..config })
        .await
        .expect("disable");
    assert!(!fx.control.status().await.expect("status").running);
}

#[tokio::test]
async fn resume_starts_monitoring_when_saved_config_is_enabled() {
    let fx = fixture().await;
    Config { urls: vec![spec("https://a.example", 60, true)], enabled: true }
        .write_config(&fx.config_path)
        .expect("seed config");

    fx.control.resume().await.expect("resume");
    assert!(fx.scheduler.is_running().await);
    fx.scheduler.stop().await.expect("stop");
}

#[tokio::test]
async fn current_status_covers_every_configured_url() {
    let fx = fixture().await;
    fx.control
        .replace_config(Config {
            urls: vec![spec("https://a.example", 60, true), spec("https://b.example", 300, false)],
            enabled: false,
        })
        .await
        .expect("replace");

    let statuses = fx.control.current_status().await.expect("current_status");
    assert_eq!(statuses.len(), 2);
    let a = &statuses["https://a.example"];
    assert!(a.previous_result.is_none(), "no checks have run yet");
    assert!(a.enabled);
    assert_eq!(a.interval, 60);
    assert!(!statuses["https://b.example"].enabled);
}

#[tokio::test]
async fn results_window_formats_chart_series_with_gaps() {
    let fx = fixture().await;

    let recent = chrono::Utc::now() - chrono::TimeDelta::minutes(5);
    let mut ok_snapshot = Snapshot::new(recent);
    ok_snapshot.record("https://a.example".into(), Some(CheckResult::success(200, 12.34)));
    fx.store.append(ok_snapshot).await.expect("append");

    let mut gap_snapshot = Snapshot::new(recent + chrono::TimeDelta::minutes(1));
    gap_snapshot.record("https://a.example".into(), None);
    fx.store.append(gap_snapshot).await.expect("append");

    let charts = fx.control.results(24).await.expect("results");
    let series = &charts["https://a.example"];
    assert_eq!(series.labels.len(), 2);
    assert_eq!(series.response_times, vec![Some(12.34), None]);
    assert_eq!(series.status_codes, vec![Some(200), None]);
}

#[tokio::test]
async fn results_window_excludes_old_history() {
    let fx = fixture().await;

    let old = chrono::Utc::now() - chrono::TimeDelta::hours(48);
    let mut snapshot = Snapshot::new(old);
    snapshot.record("https://a.example".into(), Some(CheckResult::success(200, 1.0)));
    fx.store.append(snapshot).await.expect("append");

    let charts = fx.control.results(24).await.expect("results");
    assert!(charts.is_empty());
}
