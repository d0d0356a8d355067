//! URL spec validation with reason-coded errors.
//!
//! Runs on every configuration mutation before anything is persisted, so a
//! bad request can never reach the scheduler or the config file.

use url::Url;

use crate::config::UrlSpec;
use crate::control::ControlError;

/// Validate a spec a caller wants to add or update
pub fn validate_spec(spec: &UrlSpec) -> Result<(), ControlError> {
    if spec.url.trim().is_empty() {
        return Err(ControlError::EmptyUrl);
    }

    let url = Url::parse(&spec.url)
        .map_err(|e| ControlError::InvalidInput(format!("invalid URL {:?}: {e}", spec.url)))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ControlError::InvalidInput(format!(
                "unsupported scheme for monitoring: {other}"
            )));
        }
    }

    if spec.interval == 0 {
        return Err(ControlError::InvalidInput(
            "check interval must be at least 1 second".into(),
        ));
    }

    Ok(())
}
