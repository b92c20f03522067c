//! Object store abstraction
//!
//! All backends (S3, in-memory) implement [`ObjectStore`]. A store is bound to
//! one settings snapshot; the bucket travels with each request.

use async_trait::async_trait;
use bytes::Bytes;
use s3relay_core::AppError;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::storage(err)
    }
}

/// A single object write.
#[derive(Debug, Clone)]
pub struct PutObjectRequest {
    pub bucket: String,
    pub key: String,
    pub body: Bytes,
    pub content_type: String,
    /// Canned ACL, sent only when present.
    pub acl: Option<String>,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write one object. Completes only once the backend has acknowledged it.
    async fn put_object(&self, request: PutObjectRequest) -> StorageResult<()>;
}
