use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::feed::FeedError;
use crate::propagator::PropagatorError;

#[derive(Debug)]
pub enum ApiError {
    Feed(FeedError),
    Propagator(PropagatorError),
    Validation(String),
}

impl From<FeedError> for ApiError {
    fn from(e: FeedError) -> Self {
        ApiError::Feed(e)
    }
}

impl From<PropagatorError> for ApiError {
    fn from(e: PropagatorError) -> Self {
        ApiError::Propagator(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Feed(e @ FeedError::UpstreamUnavailable(_)) => (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::with_details(
                    "Failed to fetch TLE data",
                    &e.to_string(),
                )),
            )
                .into_response(),
            ApiError::Feed(e @ FeedError::InvalidSet(_)) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_details("invalid_set", &e.to_string())),
            )
                .into_response(),
            ApiError::Propagator(e) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::with_details(
                    "propagator_unavailable",
                    &e.to_string(),
                )),
            )
                .into_response(),
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::with_details("validation_failed", &msg)),
            )
                .into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            details: None,
        }
    }

    pub fn with_details(error: &str, details: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            details: Some(details.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_failure_is_bad_gateway() {
        let response =
            ApiError::from(FeedError::UpstreamUnavailable("timed out".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn invalid_set_is_bad_request() {
        let response = ApiError::from(FeedError::InvalidSet("../x".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn exited_worker_is_unavailable() {
        let response = ApiError::from(PropagatorError::Stopped).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn details_are_omitted_when_absent() {
        let json = serde_json::to_value(ErrorResponse::new("oops")).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "oops" }));
    }
}
