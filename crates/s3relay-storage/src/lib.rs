//! s3relay Storage Library
//!
//! Object storage abstraction for relayed uploads, with an S3 implementation
//! and an in-memory one for tests.
//!
//! # Storage key format
//!
//! `{path}/{uuid}{ext}` where `path` is the configured key prefix with leading
//! slashes removed, and `ext` is the extension of the original filename with
//! its case preserved. Keys never start with `/`.

pub mod content_type;
pub mod factory;
pub mod keys;
#[cfg(feature = "storage-memory")]
pub mod memory;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;
pub mod url;

// Re-export commonly used types
pub use content_type::content_type_for;
pub use factory::ObjectStoreFactory;
#[cfg(feature = "storage-s3")]
pub use factory::S3StoreFactory;
pub use keys::{extension_of, generate_storage_key};
#[cfg(feature = "storage-memory")]
pub use memory::{MemoryObjectStore, StoredObject};
#[cfg(feature = "storage-s3")]
pub use s3::S3ObjectStore;
pub use traits::{ObjectStore, PutObjectRequest, StorageError, StorageResult};
pub use url::public_url;
