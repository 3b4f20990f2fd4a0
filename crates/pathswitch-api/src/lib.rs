//! PathSwitch HTTP API
//!
//! Control and read surface for the decision engine, plus CRUD over the
//! configuration profiles it is driven by.
//!
//! ```text
//! /health
//! /api/engine            snapshot, start | pause | reset, weights, params, profile/:id
//! /api/history           records, summary
//! /api/settings          profile CRUD
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod routes;

use axum::{routing::get, Router};
use pathswitch_common::ProfileStore;
use pathswitch_engine::Scheduler;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::ApiError;
pub use extract::ApiJson;
pub use models::*;

/// API state
#[derive(Clone)]
pub struct ApiState {
    /// Decision engine handle
    pub scheduler: Arc<Scheduler>,
    /// Profile store
    pub profiles: Arc<dyn ProfileStore>,
}

impl ApiState {
    /// Bundle the engine and profile store
    pub fn new(scheduler: Arc<Scheduler>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self {
            scheduler,
            profiles,
        }
    }
}

/// Build the API router
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

fn api_routes() -> Router<Arc<ApiState>> {
    Router::new()
        .nest("/engine", routes::engine::router())
        .nest("/history", routes::history::router())
        .nest("/settings", routes::settings::router())
}
