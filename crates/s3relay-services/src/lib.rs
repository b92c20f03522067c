//! s3relay Services Layer
//!
//! Business services: the settings resolver, the upload orchestrator and the
//! collaborators it sequences (validator, image transformer, uploader, remote
//! fetcher). Re-exports what the API crate needs so it depends on a single
//! service facade; HTTP handling stays in s3relay-api.

pub mod services;

pub use s3relay_db::{InMemorySettingsRepository, PgSettingsRepository, SettingsRepository};
pub use s3relay_processing::{is_extension_allowed, ImageTransformer, UploadValidator};
#[cfg(feature = "storage-memory")]
pub use s3relay_storage::MemoryObjectStore;
#[cfg(feature = "storage-s3")]
pub use s3relay_storage::S3StoreFactory;
pub use s3relay_storage::{extension_of, ObjectStore, ObjectStoreFactory, StorageError};
pub use services::fetch::{HttpFetcher, RemoteFetcher};
pub use services::settings::SettingsResolver;
pub use services::upload::UploadService;
pub use services::uploader::ObjectUploader;
