use actix_web::{Responder, get, web};

use crate::error::ApiError;
use crate::state::AppState;

macros_utils::routes! {
    route status_route,
    route current_status_route,
}

/// Scheduler state plus the configuration backing it
#[get("/api/status")]
pub async fn status_route(state: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    Ok(web::Json(state.control.status().await?))
}

/// Last known result per configured URL, with its monitoring settings
///
/// The view may be one tick stale with respect to checks in flight; that is
/// fine for display.
#[get("/api/current_status")]
pub async fn current_status_route(state: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    Ok(web::Json(state.control.current_status().await?))
}
