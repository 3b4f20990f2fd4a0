//! Health check endpoint

use axum::{response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

/// Liveness payload
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "healthy" when served
    pub status: String,
    /// Crate version
    pub version: String,
    /// Server time (RFC 3339)
    pub timestamp: String,
}

/// Health check
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
