//! Application state shared by every handler.

use s3relay_core::RelayConfig;
use s3relay_services::{SettingsResolver, UploadService};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct AppState {
    pub config: RelayConfig,
    pub settings: Arc<SettingsResolver>,
    pub uploads: UploadService,
    /// Stops background tasks (settings refresh) on shutdown.
    pub background: CancellationToken,
}
