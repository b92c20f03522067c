//! Object store uploader: key, content type, write, public URL.

use bytes::Bytes;
use s3relay_core::{AppError, S3Settings, UploadResult};
use s3relay_storage::{generate_storage_key, public_url, ObjectStoreFactory, PutObjectRequest};
use std::sync::Arc;

#[derive(Clone)]
pub struct ObjectUploader {
    factory: Arc<dyn ObjectStoreFactory>,
}

impl ObjectUploader {
    pub fn new(factory: Arc<dyn ObjectStoreFactory>) -> Self {
        Self { factory }
    }

    /// Write `content` under a fresh key derived from `filename` and return
    /// where it can be read from.
    #[tracing::instrument(skip(self, settings, content), fields(bucket = %settings.bucket, size_bytes = content.len()))]
    pub async fn put(
        &self,
        settings: &S3Settings,
        filename: &str,
        content: Bytes,
        content_type: String,
    ) -> Result<UploadResult, AppError> {
        let key = generate_storage_key(&settings.path, filename);
        let store = self.factory.create(settings).await?;

        store
            .put_object(PutObjectRequest {
                bucket: settings.bucket.clone(),
                key: key.clone(),
                body: content,
                content_type,
                acl: settings.acl().map(str::to_string),
            })
            .await?;

        let url = public_url(settings, &key);
        tracing::info!(key = %key, url = %url, "Upload stored");

        Ok(UploadResult {
            name: filename.to_string(),
            url,
        })
    }
}
