//! Decision history endpoints

use crate::{models::ApiResponse, ApiState};
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use pathswitch_engine::{DecisionRecord, HistorySummary};
use std::sync::Arc;

/// History routes
pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/", get(list_history))
        .route("/summary", get(history_summary))
}

/// Records in chronological order, oldest first
pub async fn list_history(
    State(state): State<Arc<ApiState>>,
) -> Json<ApiResponse<Vec<DecisionRecord>>> {
    Json(ApiResponse::success(state.scheduler.history()))
}

/// Aggregates over the current window
pub async fn history_summary(
    State(state): State<Arc<ApiState>>,
) -> Json<ApiResponse<HistorySummary>> {
    Json(ApiResponse::success(state.scheduler.history_summary()))
}
