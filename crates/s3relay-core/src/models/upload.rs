//! Upload requests, results and the host-supplied upload policy.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PROFILE_IMAGE_DIMENSION;

/// A file the host has already received and spooled to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Location of the spooled file. `None` is rejected as invalid input.
    pub path: Option<PathBuf>,
    /// Original filename as given by the uploader.
    pub name: String,
    /// Size in bytes as reported by the host.
    pub size: u64,
}

/// A remote image to fetch, resize and store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UrlUpload {
    pub url: String,
    #[serde(default)]
    pub size: u64,
}

/// Upload source, decided by whoever builds the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadRequest {
    File(FileUpload),
    Url(UrlUpload),
}

impl UploadRequest {
    /// Size the host reported for the upload.
    pub fn size(&self) -> u64 {
        match self {
            UploadRequest::File(file) => file.size,
            UploadRequest::Url(remote) => remote.size,
        }
    }
}

impl From<FileUpload> for UploadRequest {
    fn from(file: FileUpload) -> Self {
        UploadRequest::File(file)
    }
}

impl From<UrlUpload> for UploadRequest {
    fn from(remote: UrlUpload) -> Self {
        UploadRequest::Url(remote)
    }
}

/// Final location of a stored upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub name: String,
    pub url: String,
}

/// File-type and size limits configured by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Lowercase extensions with their leading dot. Empty means unrestricted.
    pub allowed_extensions: Vec<String>,
    /// Maximum upload size in kilobytes. `None` disables the check.
    pub maximum_file_size_kb: Option<u64>,
    /// Edge length, in pixels, of resized remote images.
    pub profile_image_dimension: u32,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_extensions: Vec::new(),
            maximum_file_size_kb: None,
            profile_image_dimension: DEFAULT_PROFILE_IMAGE_DIMENSION,
        }
    }
}

impl UploadPolicy {
    pub fn new<I, S>(
        allowed_extensions: I,
        maximum_file_size_kb: Option<u64>,
        profile_image_dimension: u32,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed_extensions: normalize_extensions(allowed_extensions),
            maximum_file_size_kb,
            profile_image_dimension: if profile_image_dimension == 0 {
                DEFAULT_PROFILE_IMAGE_DIMENSION
            } else {
                profile_image_dimension
            },
        }
    }

    /// Parse a raw dimension setting, falling back to the default when it is
    /// unset, non-numeric or zero.
    pub fn parse_dimension(raw: Option<&str>) -> u32 {
        raw.and_then(|value| value.trim().parse::<u32>().ok())
            .filter(|dimension| *dimension > 0)
            .unwrap_or(DEFAULT_PROFILE_IMAGE_DIMENSION)
    }

    /// Maximum upload size in bytes, if a limit is configured.
    pub fn maximum_file_size_bytes(&self) -> Option<u64> {
        self.maximum_file_size_kb.map(|kb| kb.saturating_mul(1024))
    }
}

/// Lowercase each extension, add the leading dot when missing, drop blanks and duplicates.
fn normalize_extensions<I, S>(extensions: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for ext in extensions {
        let ext = ext.as_ref().trim().to_lowercase();
        if ext.is_empty() || ext == "." {
            continue;
        }
        let ext = if ext.starts_with('.') {
            ext
        } else {
            format!(".{}", ext)
        };
        if !normalized.contains(&ext) {
            normalized.push(ext);
        }
    }
    normalized
}
