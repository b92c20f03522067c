//! s3relay core library
//!
//! This crate provides the domain models, error taxonomy, and configuration
//! shared by every s3relay component.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{EnvDefaults, RelayConfig};
pub use error::{AppError, BoxError, ErrorMetadata, LogLevel};
pub use models::{
    AdminSettingsView, BucketSettingsForm, CredentialsForm, FileUpload, S3Settings, UploadPolicy,
    UploadRequest, UploadResult, UrlUpload,
};
