//! API error mapping

use crate::models::ApiResponse;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pathswitch_common::{EngineError, ProfileError};
use thiserror::Error;

/// Errors surfaced by handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Engine rejected the request
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Profile store rejected the request
    #[error(transparent)]
    Profile(#[from] ProfileError),

    /// Body missing, malformed or of the wrong shape
    #[error("invalid request body: {}", .0.body_text())]
    BadRequest(#[from] JsonRejection),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Engine(EngineError::Configuration(_)) => {
                (StatusCode::BAD_REQUEST, "invalid_config")
            }
            Self::Engine(EngineError::UnknownPathId(_)) => {
                (StatusCode::BAD_REQUEST, "unknown_path")
            }
            Self::Engine(EngineError::TelemetryUnavailable { .. }) => {
                (StatusCode::SERVICE_UNAVAILABLE, "telemetry_unavailable")
            }
            Self::Profile(ProfileError::NotFound(_)) => (StatusCode::NOT_FOUND, "not_found"),
            Self::Profile(ProfileError::Validation { .. }) | Self::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, "validation")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::warn!(error = %self, "request failed");
        }
        (status, Json(ApiResponse::<()>::error(code, &self.to_string()))).into_response()
    }
}
