#![warn(clippy::all, clippy::pedantic)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use clap::Parser;
use tracing::info;

mod error;
mod routes;
mod state;

use error::AppError;
use logger::init_tracing;
use pingdeck::monitoring::DEFAULT_PROBE_TIMEOUT_SECONDS;
use pingdeck::store::DEFAULT_RETENTION;
use pingdeck::{Control, HttpChecker, JsonFileStore, Scheduler};
use state::AppState;

/// Pingdeck dashboard server: monitors configured URLs and serves their
/// status and history over a JSON API.
#[derive(Debug, Parser)]
#[command(name = "pingdeck-server", version, about)]
struct Args {
    /// Address to bind the API server to
    #[arg(long, env = "PINGDECK_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port for the API server
    #[arg(long, env = "PINGDECK_PORT", default_value_t = 5001)]
    port: u16,

    /// Configuration file (defaults to the XDG config directory)
    #[arg(long, env = "PINGDECK_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for the results history and event log (defaults to the XDG
    /// data directory)
    #[arg(long, env = "PINGDECK_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let data_dir = match args.data_dir {
        Some(dir) => dir,
        None => pingdeck::config::default_data_dir()?,
    };
    let event_log = data_dir.join("events.log");
    let _guard = init_tracing(Some(&event_log));

    let config_path = pingdeck::config::resolve_path(args.config.as_deref())?;

    let store =
        Arc::new(JsonFileStore::load(data_dir.join("results.json"), DEFAULT_RETENTION).await);
    let checker = Arc::new(HttpChecker::new(DEFAULT_PROBE_TIMEOUT_SECONDS)?);
    let scheduler = Arc::new(Scheduler::new(checker, store.clone()));
    let control = Control::new(config_path, scheduler, store);

    // Pick monitoring back up if the saved config left it enabled.
    control.resume().await?;

    let app_state = web::Data::new(AppState { control, event_log });

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    run_server(addr, app_state).await
}

async fn run_server(addr: SocketAddr, app_state: web::Data<AppState>) -> Result<(), AppError> {
    info!("Pingdeck API listening on {addr}");

    HttpServer::new(move || App::new().app_data(app_state.clone()).configure(routes::routes))
        .bind(addr)?
        .run()
        .await?;

    Ok(())
}
