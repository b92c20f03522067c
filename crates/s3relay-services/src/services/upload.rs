//! Upload orchestration: validate, optionally resize, store.
//!
//! Each call captures the settings snapshot once, at its start, and uses it
//! for every later stage. A concurrent settings save only affects uploads
//! that start afterwards.

use crate::services::fetch::{parse_remote_url, remote_filename, RemoteFetcher};
use crate::services::settings::SettingsResolver;
use crate::services::uploader::ObjectUploader;
use bytes::Bytes;
use s3relay_core::{AppError, FileUpload, UploadPolicy, UploadRequest, UploadResult, UrlUpload};
use s3relay_processing::{ImageTransformer, UploadValidator};
use s3relay_storage::{content_type_for, ObjectStoreFactory};
use std::sync::Arc;

#[derive(Clone)]
pub struct UploadService {
    settings: Arc<SettingsResolver>,
    validator: UploadValidator,
    profile_image_dimension: u32,
    uploader: ObjectUploader,
    fetcher: Arc<dyn RemoteFetcher>,
}

impl UploadService {
    pub fn new(
        settings: Arc<SettingsResolver>,
        policy: &UploadPolicy,
        factory: Arc<dyn ObjectStoreFactory>,
        fetcher: Arc<dyn RemoteFetcher>,
    ) -> Self {
        Self {
            settings,
            validator: UploadValidator::new(policy),
            profile_image_dimension: policy.profile_image_dimension,
            uploader: ObjectUploader::new(factory),
            fetcher,
        }
    }

    /// Store a file the host already spooled to disk.
    ///
    /// Errors are returned unlogged; the caller reports them once.
    #[tracing::instrument(skip(self, file), fields(name = %file.name, size = file.size))]
    pub async fn upload_file(&self, file: FileUpload) -> Result<UploadResult, AppError> {
        self.store_file(file).await
    }

    /// Store an image, resizing it first when it comes from a URL.
    #[tracing::instrument(skip(self, request), fields(size = request.size()))]
    pub async fn upload_image(&self, request: UploadRequest) -> Result<UploadResult, AppError> {
        match request {
            UploadRequest::File(file) => self.store_file(file).await,
            UploadRequest::Url(remote) => self.store_remote_image(remote).await,
        }
    }

    async fn store_file(&self, file: FileUpload) -> Result<UploadResult, AppError> {
        let path = file
            .path
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| AppError::InvalidInput("file path is required".to_string()))?;

        let settings = self.settings.snapshot();

        self.validator.validate_file_size(file.size)?;
        self.validator
            .validate_extension(&path.to_string_lossy())?;

        let content = tokio::fs::read(path)
            .await
            .map_err(|source| AppError::FileRead {
                path: path.display().to_string(),
                source,
            })?;

        let content_type = content_type_for(&file.name);
        self.uploader
            .put(&settings, &file.name, Bytes::from(content), content_type)
            .await
    }

    async fn store_remote_image(&self, remote: UrlUpload) -> Result<UploadResult, AppError> {
        let settings = self.settings.snapshot();

        self.validator.validate_file_size(remote.size)?;
        let url = parse_remote_url(&remote.url)?;
        let filename = remote_filename(&url);
        self.validator.validate_extension(&filename)?;

        tracing::info!(url = %url, filename = %filename, "Fetching remote image");
        let body = self.fetcher.fetch(&url).await?;
        let resized =
            ImageTransformer::resize_stream(body, self.profile_image_dimension, &filename).await?;

        let content_type = ImageTransformer::content_type(resized.format).to_string();
        self.uploader
            .put(&settings, &filename, resized.data, content_type)
            .await
    }
}
