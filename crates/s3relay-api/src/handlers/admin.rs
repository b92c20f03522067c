//! Admin settings endpoints.

use crate::constants::SAVED_MESSAGE;
use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, Json};
use s3relay_core::{AdminSettingsView, BucketSettingsForm, CredentialsForm};
use std::sync::Arc;

/// Current settings as shown on the admin page.
pub async fn get_settings(State(state): State<Arc<AppState>>) -> Json<AdminSettingsView> {
    Json(state.settings.snapshot().admin_view())
}

#[tracing::instrument(skip(state, form), fields(operation = "save_bucket_settings"))]
pub async fn save_bucket_settings(
    State(state): State<Arc<AppState>>,
    ValidatedJson(form): ValidatedJson<BucketSettingsForm>,
) -> Result<Json<&'static str>, HttpAppError> {
    state.settings.save(form.into_fields()).await?;
    Ok(Json(SAVED_MESSAGE))
}

#[tracing::instrument(skip(state, form), fields(operation = "save_credentials"))]
pub async fn save_credentials(
    State(state): State<Arc<AppState>>,
    ValidatedJson(form): ValidatedJson<CredentialsForm>,
) -> Result<Json<&'static str>, HttpAppError> {
    state.settings.save(form.into_fields()).await?;
    Ok(Json(SAVED_MESSAGE))
}
