use std::io::Error as IoError;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use pingdeck::ControlError;
use serde::Serialize;
use thiserror::Error;

/// Startup and wiring failures
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0:#}")]
    Io(#[from] IoError),
    #[error("Address parsing error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),
    #[error(transparent)]
    Config(#[from] pingdeck::config::ConfigError),
    #[error(transparent)]
    Control(#[from] ControlError),
    #[error("{0:#}")]
    Engine(#[from] pingdeck::anyhow::Error),
}

/// Handler-level error: an engine error mapped onto an HTTP response
///
/// The body always carries the stable reason code (EMPTY_URL, URL_NOT_FOUND,
/// URL_ALREADY_EXISTS, INVALID_INPUT, ...) alongside a human-readable
/// message.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] ControlError);

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: &'static str,
    message: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            ControlError::EmptyUrl | ControlError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ControlError::UrlNotFound(_) => StatusCode::NOT_FOUND,
            ControlError::UrlAlreadyExists(_) => StatusCode::CONFLICT,
            ControlError::Config(_) | ControlError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            success: false,
            error: self.0.code(),
            message: self.0.to_string(),
        })
    }
}
