//! Upload endpoints.

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::spool_multipart_file;
use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::header::CONTENT_TYPE,
    Json,
};
use s3relay_core::{UploadRequest, UploadResult, UrlUpload};
use std::sync::Arc;

/// Store a file sent as the multipart field `file`.
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_file"))]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResult>, HttpAppError> {
    let spooled = spool_multipart_file(multipart).await?;
    let result = state.uploads.upload_file(spooled.to_upload()).await?;
    // The temporary file is removed only after the upload completed.
    drop(spooled);
    Ok(Json(result))
}

/// Store an image sent either as the multipart field `file` or as a JSON
/// `{url, size}` body naming a remote image.
#[tracing::instrument(skip(state, request), fields(operation = "upload_image"))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<UploadResult>, HttpAppError> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let result = if is_multipart {
        let multipart = Multipart::from_request(request, &state).await?;
        let spooled = spool_multipart_file(multipart).await?;
        let result = state
            .uploads
            .upload_image(UploadRequest::File(spooled.to_upload()))
            .await?;
        drop(spooled);
        result
    } else {
        let Json(remote) = Json::<UrlUpload>::from_request(request, &state).await?;
        state.uploads.upload_image(UploadRequest::Url(remote)).await?
    };

    Ok(Json(result))
}
