use actix_web::{Responder, get, web};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

macros_utils::routes! {
    route results_route,
}

const DEFAULT_WINDOW_HOURS: u32 = 24;

#[derive(Debug, Deserialize)]
pub struct ResultsQuery {
    hours: Option<u32>,
}

/// Chart-ready history per URL for the requested window
#[get("/api/results")]
pub async fn results_route(
    state: web::Data<AppState>,
    query: web::Query<ResultsQuery>,
) -> Result<impl Responder, ApiError> {
    let hours = query.hours.unwrap_or(DEFAULT_WINDOW_HOURS);
    Ok(web::Json(state.control.results(hours).await?))
}
