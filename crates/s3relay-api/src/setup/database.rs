//! Settings store setup

use anyhow::{Context, Result};
use s3relay_core::RelayConfig;
use s3relay_services::{InMemorySettingsRepository, PgSettingsRepository, SettingsRepository};
use sqlx::postgres::PgPoolOptions;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Connect to Postgres and run migrations when `DATABASE_URL` is set,
/// otherwise keep settings in process memory.
pub async fn setup_settings_store(config: &RelayConfig) -> Result<Arc<dyn SettingsRepository>> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set, settings are kept in memory and lost on restart");
        return Ok(Arc::new(InMemorySettingsRepository::new()));
    };

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected successfully");

    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    let migrator = sqlx::migrate::Migrator::new(migrations_dir)
        .await
        .context("Failed to load migrations")?;
    migrator
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    Ok(Arc::new(PgSettingsRepository::new(pool)))
}
