use std::path::Path;

use actix_web::{Responder, get, web};
use serde::Serialize;

use crate::state::AppState;

macros_utils::routes! {
    route logs_route,
}

const LOG_TAIL_LINES: usize = 50;

#[derive(Serialize)]
struct LogsResponse {
    logs: Vec<String>,
}

/// Tail of the append-only event log
#[get("/api/logs")]
pub async fn logs_route(state: web::Data<AppState>) -> impl Responder {
    web::Json(LogsResponse { logs: tail_lines(&state.event_log, LOG_TAIL_LINES) })
}

/// Last `limit` lines of the log file; a missing or unreadable file is empty
fn tail_lines(path: &Path, limit: usize) -> Vec<String> {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    let lines: Vec<&str> = contents.lines().collect();
    let start = lines.len().saturating_sub(limit);
    lines[start..].iter().map(|line| line.to_string()).collect()
}
