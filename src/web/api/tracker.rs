use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use utoipa::ToSchema;

use crate::feed::{first_records, OrbitalElementRecord, Source};
use crate::propagator::Configure;
use crate::render::ObjectSample;
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct InitRequest {
    /// Element set to track; the configured default when absent.
    #[serde(default)]
    pub set: Option<String>,
    /// Track only the first `limit` records of the set.
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InitResponse {
    pub set: String,
    pub source: Source,
    /// Records handed to the propagator; unparsable ones are dropped there.
    pub records: usize,
}

/// The raw outbound buffer: x/y/z per object, `null` where unpositionable.
#[derive(Debug, Serialize, ToSchema)]
pub struct BufferResponse {
    pub generation: u64,
    pub count: usize,
    pub positions: Vec<f32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PositionsResponse {
    pub generation: Option<u64>,
    pub objects: Vec<ObjectSample>,
}

#[utoipa::path(
    post,
    path = "/api/tracker/init",
    request_body = InitRequest,
    responses(
        (status = 200, description = "Propagator initialized", body = InitResponse),
        (status = 400, description = "Invalid set name", body = ErrorResponse),
        (status = 502, description = "Upstream feed unavailable", body = ErrorResponse),
        (status = 503, description = "Propagator not running", body = ErrorResponse)
    ),
    tag = "tracker"
)]
pub async fn init(
    State(state): State<AppState>,
    Json(request): Json<InitRequest>,
) -> ApiResult<Json<InitResponse>> {
    let (response, records) = load_records(&state, request).await?;
    state.propagator.initialize(records)?;
    log::info!("Tracker initialized with {} records of {}", response.records, response.set);
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/tracker/update",
    request_body = InitRequest,
    responses(
        (status = 200, description = "Tracked set replaced", body = InitResponse),
        (status = 400, description = "Invalid set name", body = ErrorResponse),
        (status = 502, description = "Upstream feed unavailable", body = ErrorResponse),
        (status = 503, description = "Propagator not running", body = ErrorResponse)
    ),
    tag = "tracker"
)]
pub async fn update(
    State(state): State<AppState>,
    Json(request): Json<InitRequest>,
) -> ApiResult<Json<InitResponse>> {
    let (response, records) = load_records(&state, request).await?;
    state.propagator.update_records(records)?;
    log::info!("Tracked set replaced with {} records of {}", response.records, response.set);
    Ok(Json(response))
}

async fn load_records(
    state: &AppState,
    request: InitRequest,
) -> ApiResult<(InitResponse, Vec<OrbitalElementRecord>)> {
    let set = request
        .set
        .unwrap_or_else(|| state.config.feed.default_set.clone());

    let fetched = state.cache.get(&set).await?;
    let records = first_records(&fetched.records, request.limit);

    let response = InitResponse {
        set,
        source: fetched.source,
        records: records.len(),
    };
    Ok((response, records))
}

#[utoipa::path(
    post,
    path = "/api/tracker/config",
    request_body = Configure,
    responses(
        (status = 204, description = "Configuration applied"),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 503, description = "Propagator not running", body = ErrorResponse)
    ),
    tag = "tracker"
)]
pub async fn config(
    State(state): State<AppState>,
    Json(configure): Json<Configure>,
) -> ApiResult<StatusCode> {
    configure.validate().map_err(ApiError::Validation)?;
    state.propagator.configure(configure)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/tracker/stop",
    responses(
        (status = 204, description = "Propagator stopped"),
        (status = 503, description = "Propagator not running", body = ErrorResponse)
    ),
    tag = "tracker"
)]
pub async fn stop(State(state): State<AppState>) -> ApiResult<StatusCode> {
    state.propagator.stop()?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/tracker/buffer",
    responses(
        (status = 200, description = "Latest published buffer", body = BufferResponse),
        (status = 204, description = "Nothing published yet")
    ),
    tag = "tracker"
)]
pub async fn buffer(State(state): State<AppState>) -> Response {
    let latest = state.propagator.subscribe().borrow().clone();
    match latest {
        Some(buffer) => Json(BufferResponse {
            generation: buffer.generation(),
            count: buffer.count(),
            positions: buffer.to_flat(),
        })
        .into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/tracker/positions",
    responses(
        (status = 200, description = "Interpolated render-space positions", body = PositionsResponse)
    ),
    tag = "tracker"
)]
pub async fn positions(State(state): State<AppState>) -> Json<PositionsResponse> {
    let scene = state.scene.lock().await;
    let now = Instant::now();

    Json(PositionsResponse {
        generation: scene.generation(),
        objects: scene.objects(now),
    })
}
