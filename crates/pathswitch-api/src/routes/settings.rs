//! Configuration profile endpoints

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::{models::ApiResponse, ApiState};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use pathswitch_common::{NewProfile, Profile, ProfileUpdate};
use std::sync::Arc;

/// Settings routes
pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/", get(list_profiles).post(create_profile))
        .route(
            "/:id",
            get(get_profile).put(update_profile).delete(delete_profile),
        )
}

/// All stored profiles
pub async fn list_profiles(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<ApiResponse<Vec<Profile>>>, ApiError> {
    let profiles = state.profiles.list_profiles().await?;
    Ok(Json(ApiResponse::success(profiles)))
}

/// One profile by id
pub async fn get_profile(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<u64>,
) -> Result<Json<ApiResponse<Profile>>, ApiError> {
    let profile = state.profiles.get_profile(id).await?;
    Ok(Json(ApiResponse::success(profile)))
}

/// Store a new profile
pub async fn create_profile(
    State(state): State<Arc<ApiState>>,
    ApiJson(input): ApiJson<NewProfile>,
) -> Result<(StatusCode, Json<ApiResponse<Profile>>), ApiError> {
    let profile = state.profiles.create_profile(input).await?;
    tracing::info!(id = profile.id, name = %profile.name, "profile created");
    Ok((StatusCode::CREATED, Json(ApiResponse::success(profile))))
}

/// Partially update a profile
pub async fn update_profile(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<u64>,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> Result<Json<ApiResponse<Profile>>, ApiError> {
    let profile = state.profiles.update_profile(id, update).await?;
    Ok(Json(ApiResponse::success(profile)))
}

/// Remove a profile
pub async fn delete_profile(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    state.profiles.delete_profile(id).await?;
    tracing::info!(id, "profile deleted");
    Ok(StatusCode::NO_CONTENT)
}
