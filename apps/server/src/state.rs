use std::path::PathBuf;

use pingdeck::Control;

/// Shared state handed to every handler
pub struct AppState {
    pub control: Control,
    /// Location of the append-only event log served by /api/logs
    pub event_log: PathBuf,
}
