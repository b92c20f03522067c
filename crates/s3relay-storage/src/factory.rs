//! Object store construction per settings snapshot.

#[cfg(feature = "storage-memory")]
use crate::MemoryObjectStore;
#[cfg(feature = "storage-s3")]
use crate::S3ObjectStore;
use crate::{ObjectStore, StorageResult};
use async_trait::async_trait;
use s3relay_core::S3Settings;
use std::sync::Arc;

/// Builds the store an upload writes to from the settings captured at the
/// start of that upload.
#[async_trait]
pub trait ObjectStoreFactory: Send + Sync {
    async fn create(&self, settings: &S3Settings) -> StorageResult<Arc<dyn ObjectStore>>;
}

/// S3 factory. The client of the last snapshot is reused while settings are unchanged.
#[cfg(feature = "storage-s3")]
#[derive(Default)]
pub struct S3StoreFactory {
    cached: tokio::sync::Mutex<Option<(S3Settings, Arc<S3ObjectStore>)>>,
}

#[cfg(feature = "storage-s3")]
impl S3StoreFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "storage-s3")]
#[async_trait]
impl ObjectStoreFactory for S3StoreFactory {
    async fn create(&self, settings: &S3Settings) -> StorageResult<Arc<dyn ObjectStore>> {
        let mut cached = self.cached.lock().await;
        if let Some((ref cached_settings, ref store)) = *cached {
            if cached_settings == settings {
                return Ok(store.clone());
            }
        }

        tracing::debug!(region = %settings.region, endpoint = %settings.endpoint, "Building S3 client");
        let store = Arc::new(S3ObjectStore::from_settings(settings).await?);
        *cached = Some((settings.clone(), store.clone()));
        Ok(store)
    }
}

/// Every snapshot shares the same in-memory store.
#[cfg(feature = "storage-memory")]
#[async_trait]
impl ObjectStoreFactory for MemoryObjectStore {
    async fn create(&self, _settings: &S3Settings) -> StorageResult<Arc<dyn ObjectStore>> {
        Ok(Arc::new(self.clone()))
    }
}
