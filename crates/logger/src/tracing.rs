use std::env::var;
use std::fs::OpenOptions;
use std::path::Path;

use tracing::{level_filters::LevelFilter, warn};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{Layer, filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing with a console layer and, when `event_log` is given,
/// a plain-text file layer appending one line per event.
///
/// The file layer feeds the event log the dashboard serves. Opening it can
/// fail (bad path, read-only disk); that is logged and tolerated so the
/// process still comes up with console logging alone. Keep the returned
/// guard alive for the life of the process, or buffered lines are dropped.
pub fn init(event_log: Option<&Path>) -> Option<WorkerGuard> {
    initialize_tracing(LevelFilter::INFO, event_log)
}

fn initialize_tracing(level: LevelFilter, event_log: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

    let log_format = var("RUST_LOG_FORMAT").unwrap_or_default();

    let console_layer = match log_format.as_str() {
        "json" => tracing_subscriber::fmt::layer().json().with_filter(env_filter).boxed(),
        _ => tracing_subscriber::fmt::layer()
            .compact()
            .without_time()
            .with_filter(env_filter)
            .boxed(),
    };

    let mut open_error = None;
    let (file_layer, guard) = match event_log.map(open_event_log) {
        Some(Ok((writer, guard))) => {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false)
                .with_filter(LevelFilter::INFO)
                .boxed();
            (Some(layer), Some(guard))
        }
        Some(Err(error)) => {
            open_error = Some(error);
            (None, None)
        }
        None => (None, None),
    };

    tracing_subscriber::registry().with(console_layer).with(file_layer).init();

    if let Some(error) = open_error {
        warn!("Could not open event log, continuing without it: {error}");
    }

    guard
}

fn open_event_log(path: &Path) -> std::io::Result<(NonBlocking, WorkerGuard)> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(tracing_appender::non_blocking(file))
}
