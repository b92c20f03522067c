//! Route configuration and setup

use crate::constants::{
    ADMIN_PREFIX, API_PREFIX, DEFAULT_BODY_LIMIT_BYTES, MULTIPART_OVERHEAD_BYTES,
};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use s3relay_core::RelayConfig;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &RelayConfig, state: Arc<AppState>) -> Router<()> {
    let body_limit = body_limit_bytes(config);
    tracing::info!(body_limit, "Request body limit configured");

    Router::new()
        .route("/health", get(handlers::health::liveness_check))
        .merge(admin_routes())
        .merge(upload_routes())
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
}

fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(ADMIN_PREFIX, get(handlers::admin::get_settings))
        .route(
            &format!("{}/s3settings", ADMIN_PREFIX),
            post(handlers::admin::save_bucket_settings),
        )
        .route(
            &format!("{}/credentials", ADMIN_PREFIX),
            post(handlers::admin::save_credentials),
        )
}

fn upload_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/uploads/file", API_PREFIX),
            post(handlers::upload::upload_file),
        )
        .route(
            &format!("{}/uploads/image", API_PREFIX),
            post(handlers::upload::upload_image),
        )
}

/// Bodies may exceed the configured maximum by the multipart framing, so
/// that oversized files still reach the validator and get its error message.
fn body_limit_bytes(config: &RelayConfig) -> usize {
    config
        .upload_policy
        .maximum_file_size_bytes()
        .and_then(|bytes| usize::try_from(bytes).ok())
        .map(|bytes| bytes.saturating_add(MULTIPART_OVERHEAD_BYTES))
        .unwrap_or(DEFAULT_BODY_LIMIT_BYTES)
}
