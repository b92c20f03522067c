//! Service initialization

use crate::state::AppState;
use anyhow::Result;
use s3relay_core::RelayConfig;
use s3relay_services::{
    HttpFetcher, S3StoreFactory, SettingsRepository, SettingsResolver, UploadService,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Build the settings resolver and upload service, load the first settings
/// snapshot and start the periodic refresh.
pub async fn initialize_services(
    config: &RelayConfig,
    repository: Arc<dyn SettingsRepository>,
) -> Result<Arc<AppState>> {
    let settings = Arc::new(SettingsResolver::new(
        repository,
        config.env_defaults.clone(),
    ));

    match settings.fetch().await {
        Ok(snapshot) => tracing::info!(
            bucket = %snapshot.bucket,
            region = %snapshot.region,
            static_credentials = snapshot.has_static_credentials(),
            "Initial settings loaded"
        ),
        Err(e) => tracing::warn!(error = %e, "Initial settings fetch failed, using environment defaults"),
    }

    let background = CancellationToken::new();
    if config.settings_refresh_interval_secs > 0 {
        settings.spawn_refresh(
            Duration::from_secs(config.settings_refresh_interval_secs),
            background.clone(),
        );
        tracing::info!(
            interval_secs = config.settings_refresh_interval_secs,
            "Settings refresh task started"
        );
    }

    let uploads = UploadService::new(
        settings.clone(),
        &config.upload_policy,
        Arc::new(S3StoreFactory::new()),
        Arc::new(HttpFetcher::new(reqwest::Client::new())),
    );

    Ok(Arc::new(AppState {
        config: config.clone(),
        settings,
        uploads,
        background,
    }))
}
