use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::feed::{FeedSource, OrbitalElementRecord, Source, TleCache};
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct TleResponse {
    pub source: Source,
    pub data: Vec<OrbitalElementRecord>,
}

#[utoipa::path(
    get,
    path = "/api/tle",
    tag = "feed",
    responses(
        (status = 200, description = "Records of the default set", body = TleResponse),
        (status = 502, description = "Upstream feed unavailable", body = ErrorResponse)
    )
)]
pub async fn get_default_set(State(state): State<AppState>) -> ApiResult<Json<TleResponse>> {
    fetch_set(&state.cache, &state.config.feed.default_set)
        .await
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/api/tle/{set}",
    tag = "feed",
    params(
        ("set" = String, Path, description = "Element set name, e.g. active, visual, stations")
    ),
    responses(
        (status = 200, description = "Records of the set", body = TleResponse),
        (status = 400, description = "Invalid set name", body = ErrorResponse),
        (status = 502, description = "Upstream feed unavailable", body = ErrorResponse)
    )
)]
pub async fn get_set(
    State(state): State<AppState>,
    Path(set): Path<String>,
) -> ApiResult<Json<TleResponse>> {
    fetch_set(&state.cache, &set).await.map(Json)
}

pub async fn fetch_set<F: FeedSource>(cache: &TleCache<F>, set: &str) -> ApiResult<TleResponse> {
    let fetched = cache.get(set).await?;
    Ok(TleResponse {
        source: fetched.source,
        data: fetched.records.to_vec(),
    })
}
