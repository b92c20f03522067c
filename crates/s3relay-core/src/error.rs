//! Error types module
//!
//! Every failure an upload or a settings operation can produce is one of the
//! `AppError` variants below. Messages are prefixed with the plugin identity so
//! they can be traced back to this component in shared host logs.
//!
//! Component crates keep their own `thiserror` enums (storage, validation,
//! transform, persistence) and convert into `AppError` at the service boundary.

use crate::constants::PLUGIN_ID;

/// Boxed error used to carry the underlying cause of a wrapped failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "FILE_TOO_BIG")
    fn error_code(&self) -> &'static str;

    /// Whether the caller may retry the same request unchanged
    fn is_recoverable(&self) -> bool;

    /// Client-facing message in the `[[error:<kind>, <params>]]` translation convention
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{id} :: invalid input: {0}", id = PLUGIN_ID)]
    InvalidInput(String),

    #[error("{id} :: file too big (maximum {max_kb} KB)", id = PLUGIN_ID)]
    FileTooBig { max_kb: u64 },

    #[error("{id} :: invalid file type (allowed: {list})", id = PLUGIN_ID, list = .allowed.join(", "))]
    InvalidFileType { allowed: Vec<String> },

    #[error("{id} :: failed to read uploaded file {path}: {source}", id = PLUGIN_ID)]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{id} :: image transform failed: {source}", id = PLUGIN_ID)]
    Transform {
        #[source]
        source: BoxError,
    },

    #[error("{id} :: storage error: {source}", id = PLUGIN_ID)]
    Storage {
        #[source]
        source: BoxError,
    },

    #[error("{id} :: settings persistence error: {source}", id = PLUGIN_ID)]
    Persistence {
        #[source]
        source: BoxError,
    },
}

impl AppError {
    pub fn transform(err: impl Into<BoxError>) -> Self {
        AppError::Transform { source: err.into() }
    }

    pub fn storage(err: impl Into<BoxError>) -> Self {
        AppError::Storage { source: err.into() }
    }

    pub fn persistence(err: impl Into<BoxError>) -> Self {
        AppError::Persistence { source: err.into() }
    }

    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::FileTooBig { .. } => "FileTooBig",
            AppError::InvalidFileType { .. } => "InvalidFileType",
            AppError::FileRead { .. } => "FileReadError",
            AppError::Transform { .. } => "TransformError",
            AppError::Storage { .. } => "StorageError",
            AppError::Persistence { .. } => "PersistenceError",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }

    /// Emit this error through `tracing` at the level the variant declares.
    pub fn log(&self) {
        let error_type = self.error_type();
        match self.log_level() {
            LogLevel::Debug => tracing::debug!(error = %self, error_type, "Error occurred"),
            LogLevel::Warn => tracing::warn!(error = %self, error_type, "Error occurred"),
            LogLevel::Error => tracing::error!(error = %self, error_type, "Error occurred"),
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, LogLevel::Debug),
        AppError::FileTooBig { .. } => (413, "FILE_TOO_BIG", false, LogLevel::Debug),
        AppError::InvalidFileType { .. } => (400, "INVALID_FILE_TYPE", false, LogLevel::Debug),
        AppError::FileRead { .. } => (500, "FILE_READ_ERROR", false, LogLevel::Error),
        AppError::Transform { .. } => (422, "TRANSFORM_ERROR", false, LogLevel::Warn),
        AppError::Storage { .. } => (502, "STORAGE_ERROR", true, LogLevel::Error),
        AppError::Persistence { .. } => (500, "PERSISTENCE_ERROR", true, LogLevel::Error),
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(_) => "[[error:invalid-data]]".to_string(),
            AppError::FileTooBig { max_kb } => format!("[[error:file-too-big, {}]]", max_kb),
            // The list separator is an escaped comma so the translator does not split on it.
            AppError::InvalidFileType { allowed } => {
                format!("[[error:invalid-file-type, {}]]", allowed.join("&#44; "))
            }
            AppError::Transform { .. } => "[[error:invalid-image]]".to_string(),
            AppError::FileRead { .. } | AppError::Storage { .. } => {
                "[[error:upload-failed]]".to_string()
            }
            AppError::Persistence { .. } => "[[error:settings-unavailable]]".to_string(),
        }
    }
}
