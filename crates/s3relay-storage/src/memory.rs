//! In-memory object store. Records every write for inspection.

use crate::traits::{ObjectStore, PutObjectRequest, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// An object as it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub body: Bytes,
    pub content_type: String,
    pub acl: Option<String>,
}

#[derive(Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<Mutex<HashMap<(String, String), StoredObject>>>,
    failing: Arc<AtomicBool>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every subsequent write until reset.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn get(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .ok()?
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects
            .lock()
            .map(|objects| objects.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().map(|objects| objects.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(&self, request: PutObjectRequest) -> StorageResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("access denied".to_string()));
        }
        if request.key.starts_with('/') {
            return Err(StorageError::InvalidKey(request.key));
        }

        let object = StoredObject {
            bucket: request.bucket,
            key: request.key,
            body: request.body,
            content_type: request.content_type,
            acl: request.acl,
        };
        tracing::debug!(bucket = %object.bucket, key = %object.key, "Stored object in memory");

        let mut objects = self
            .objects
            .lock()
            .map_err(|_| StorageError::UploadFailed("store lock poisoned".to_string()))?;
        objects.insert((object.bucket.clone(), object.key.clone()), object);
        Ok(())
    }
}
