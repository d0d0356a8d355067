use actix_web::{Responder, post, web};
use serde::{Deserialize, Serialize};

use pingdeck::config::{Config, UrlSpec};

use crate::error::ApiError;
use crate::state::AppState;

macros_utils::routes! {
    route add_url_route,
    route update_url_route,
    route remove_url_route,
    route update_config_route,
}

/// Success payload for every configuration mutation
#[derive(Debug, Serialize)]
struct MutationResponse {
    success: bool,
    config: Config,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_url_index: Option<usize>,
}

impl MutationResponse {
    fn new(config: Config) -> Self {
        Self { success: true, config, new_url_index: None }
    }
}

/// Add one URL to the monitored set
///
/// `interval` and `enabled` fall back to their defaults when omitted.
#[post("/api/add_url")]
pub async fn add_url_route(
    state: web::Data<AppState>,
    body: web::Json<UrlSpec>,
) -> Result<impl Responder, ApiError> {
    let (config, index) = state.control.add_url(body.into_inner()).await?;
    Ok(web::Json(MutationResponse { new_url_index: Some(index), ..MutationResponse::new(config) }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUrlRequest {
    original_url: String,
    #[serde(flatten)]
    spec: UrlSpec,
}

/// Update (possibly renaming) the spec stored under `original_url`
#[post("/api/update_url")]
pub async fn update_url_route(
    state: web::Data<AppState>,
    body: web::Json<UpdateUrlRequest>,
) -> Result<impl Responder, ApiError> {
    let UpdateUrlRequest { original_url, spec } = body.into_inner();
    let config = state.control.update_url(&original_url, spec).await?;
    Ok(web::Json(MutationResponse::new(config)))
}

#[derive(Debug, Deserialize)]
pub struct RemoveUrlRequest {
    url: String,
}

#[post("/api/remove_url")]
pub async fn remove_url_route(
    state: web::Data<AppState>,
    body: web::Json<RemoveUrlRequest>,
) -> Result<impl Responder, ApiError> {
    let config = state.control.remove_url(&body.url).await?;
    Ok(web::Json(MutationResponse::new(config)))
}

/// Bulk-replace the whole configuration
#[post("/api/update_config")]
pub async fn update_config_route(
    state: web::Data<AppState>,
    body: web::Json<Config>,
) -> Result<impl Responder, ApiError> {
    let config = state.control.replace_config(body.into_inner()).await?;
    Ok(web::Json(MutationResponse::new(config)))
}
