//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;

use crate::state::{AppState, Repositories};
use anyhow::{Context, Result};
use imagehub_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.is_production())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = config.environment(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;

    let storage = imagehub_storage::create_storage(&config)
        .await
        .context("Failed to initialize storage")?;
    tracing::info!(upload_dir = %config.upload_dir().display(), "Local storage ready");

    let state = Arc::new(AppState::new(
        &config,
        Repositories::postgres(pool),
        storage,
    ));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
