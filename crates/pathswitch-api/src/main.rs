//! PathSwitch Server - Main Entry Point

use anyhow::Context;
use pathswitch_api::{build_router, ApiState, ServerConfig};
use pathswitch_common::{seed_defaults, InMemoryProfileStore, ProfileStore};
use pathswitch_engine::{Scheduler, SyntheticTelemetry, TelemetrySource};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("PathSwitch v{}", env!("CARGO_PKG_VERSION"));

    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "/etc/pathswitch/server.json".into());

    let config = ServerConfig::load(&config_path).unwrap_or_else(|e| {
        tracing::warn!(path = %config_path, error = %e, "Config not loaded, using defaults");
        ServerConfig::default()
    });

    // Profiles
    let profiles: Arc<dyn ProfileStore> = Arc::new(InMemoryProfileStore::new());
    seed_defaults(profiles.as_ref()).await?;

    // Engine
    let source: Arc<dyn TelemetrySource> = Arc::new(match config.seed {
        Some(seed) => SyntheticTelemetry::seeded(seed),
        None => SyntheticTelemetry::from_entropy(),
    });
    let scheduler = Arc::new(
        Scheduler::new(config.engine.clone(), source).context("invalid engine configuration")?,
    );

    if let Some(profile) = profiles.default_profile().await? {
        scheduler.apply(profile.weights(), profile.params())?;
        tracing::info!(profile = %profile.name, "default profile activated");
    }

    if config.autostart {
        scheduler.start().await;
    }

    // Serve
    let app = build_router(ApiState::new(scheduler.clone(), profiles));
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("API listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.pause().await;
    tracing::info!("PathSwitch stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
