use s3relay_core::{AppError, UploadPolicy};
use s3relay_storage::extension_of;

/// Upload validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max_kb} KB)")]
    FileTooBig { size: u64, max_kb: u64 },

    #[error("Invalid file extension: {extension:?} (allowed: {allowed:?})")]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::FileTooBig { max_kb, .. } => AppError::FileTooBig { max_kb },
            ValidationError::InvalidExtension { allowed, .. } => {
                AppError::InvalidFileType { allowed }
            }
        }
    }
}

/// Whether `filename` has an extension in `allowed`.
///
/// The extension is the part of the final path segment from its last dot,
/// compared lowercased. An empty allow-list permits everything; a name
/// without an extension is otherwise rejected.
pub fn is_extension_allowed(filename: &str, allowed: &[String]) -> bool {
    if allowed.is_empty() {
        return true;
    }
    let extension = extension_of(filename).to_lowercase();
    !extension.is_empty() && allowed.iter().any(|a| a == &extension)
}

/// Checks uploads against the host's size and file-type policy.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    allowed_extensions: Vec<String>,
    maximum_file_size_kb: Option<u64>,
}

impl UploadValidator {
    pub fn new(policy: &UploadPolicy) -> Self {
        Self {
            allowed_extensions: policy.allowed_extensions.clone(),
            maximum_file_size_kb: policy.maximum_file_size_kb,
        }
    }

    /// Reject sizes strictly above the configured maximum.
    pub fn validate_file_size(&self, size: u64) -> Result<(), ValidationError> {
        if let Some(max_kb) = self.maximum_file_size_kb {
            if size > max_kb.saturating_mul(1024) {
                return Err(ValidationError::FileTooBig { size, max_kb });
            }
        }
        Ok(())
    }

    pub fn validate_extension(&self, filename: &str) -> Result<(), ValidationError> {
        if !is_extension_allowed(filename, &self.allowed_extensions) {
            return Err(ValidationError::InvalidExtension {
                extension: extension_of(filename).to_string(),
                allowed: self.allowed_extensions.clone(),
            });
        }
        Ok(())
    }
}
