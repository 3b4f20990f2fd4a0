//! Engine control endpoints

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::models::{ApiResponse, EngineStatus};
use crate::ApiState;
use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use pathswitch_common::{DecisionParameters, Profile, WeightVector};
use std::sync::Arc;

/// Engine routes
pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/", get(get_engine))
        .route("/start", post(start_engine))
        .route("/pause", post(pause_engine))
        .route("/reset", post(reset_engine))
        .route("/weights", put(update_weights))
        .route("/params", put(update_params))
        .route("/profile/:id", post(activate_profile))
}

fn status(state: &ApiState) -> Json<ApiResponse<EngineStatus>> {
    Json(ApiResponse::success(EngineStatus {
        snapshot: state.scheduler.snapshot(),
        config: (*state.scheduler.config()).clone(),
    }))
}

/// Current engine snapshot and configuration
pub async fn get_engine(State(state): State<Arc<ApiState>>) -> Json<ApiResponse<EngineStatus>> {
    status(&state)
}

/// Start periodic decisions
pub async fn start_engine(State(state): State<Arc<ApiState>>) -> Json<ApiResponse<EngineStatus>> {
    state.scheduler.start().await;
    status(&state)
}

/// Stop periodic decisions, keeping state
pub async fn pause_engine(State(state): State<Arc<ApiState>>) -> Json<ApiResponse<EngineStatus>> {
    state.scheduler.pause().await;
    status(&state)
}

/// Stop and return to Path-1 with an empty history
pub async fn reset_engine(State(state): State<Arc<ApiState>>) -> Json<ApiResponse<EngineStatus>> {
    state.scheduler.reset().await;
    status(&state)
}

/// Replace the scoring weights
pub async fn update_weights(
    State(state): State<Arc<ApiState>>,
    ApiJson(weights): ApiJson<WeightVector>,
) -> Result<Json<ApiResponse<EngineStatus>>, ApiError> {
    state.scheduler.set_weights(weights)?;
    Ok(status(&state))
}

/// Replace margin and interval
pub async fn update_params(
    State(state): State<Arc<ApiState>>,
    ApiJson(params): ApiJson<DecisionParameters>,
) -> Result<Json<ApiResponse<EngineStatus>>, ApiError> {
    state.scheduler.set_params(params)?;
    Ok(status(&state))
}

/// Copy a stored profile into the live configuration
pub async fn activate_profile(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<u64>,
) -> Result<Json<ApiResponse<Profile>>, ApiError> {
    let profile = state.profiles.get_profile(id).await?;
    state.scheduler.apply(profile.weights(), profile.params())?;
    tracing::info!(profile = %profile.name, id, "profile activated");
    Ok(Json(ApiResponse::success(profile)))
}
