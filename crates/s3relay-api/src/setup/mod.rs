//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod services;

use crate::state::AppState;
use anyhow::{Context, Result};
use s3relay_core::RelayConfig;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: RelayConfig) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.is_production())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(environment = %config.environment, "Configuration loaded and validated successfully");

    let repository = database::setup_settings_store(&config).await?;
    let state = services::initialize_services(&config, repository).await?;
    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router))
}
