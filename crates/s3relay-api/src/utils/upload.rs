//! Multipart spooling for upload handlers.

use axum::extract::Multipart;
use s3relay_core::{AppError, FileUpload};
use s3relay_services::extension_of;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

/// An uploaded file written to a temporary file. The file is removed when
/// this value is dropped, so it must outlive the upload call.
pub struct SpooledFile {
    pub temp: NamedTempFile,
    pub name: String,
    pub size: u64,
}

impl SpooledFile {
    pub fn to_upload(&self) -> FileUpload {
        FileUpload {
            path: Some(self.temp.path().to_path_buf()),
            name: self.name.clone(),
            size: self.size,
        }
    }
}

/// Stream the single field named "file" to disk, keeping the extension of
/// its filename on the temporary path. Other fields are ignored.
pub async fn spool_multipart_file(mut multipart: Multipart) -> Result<SpooledFile, AppError> {
    let mut spooled: Option<SpooledFile> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        if spooled.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }

        let name = field
            .file_name()
            .map(sanitize_filename)
            .unwrap_or_default();
        let temp = tempfile::Builder::new()
            .prefix("s3relay-")
            .suffix(extension_of(&name))
            .tempfile()
            .map_err(|e| AppError::InvalidInput(format!("Failed to spool upload: {}", e)))?;
        let std_file = temp
            .reopen()
            .map_err(|e| AppError::InvalidInput(format!("Failed to spool upload: {}", e)))?;
        let mut file = tokio::fs::File::from_std(std_file);

        let mut size = 0u64;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?
        {
            size += chunk.len() as u64;
            file.write_all(&chunk)
                .await
                .map_err(|e| AppError::InvalidInput(format!("Failed to spool upload: {}", e)))?;
        }
        file.flush()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to spool upload: {}", e)))?;

        tracing::debug!(name = %name, size, path = %temp.path().display(), "Upload spooled");
        spooled = Some(SpooledFile { temp, name, size });
    }

    spooled.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))
}

/// Keep only the final path component of a client-supplied filename.
fn sanitize_filename(raw: &str) -> String {
    raw.rsplit(['/', '\\']).next().unwrap_or(raw).to_string()
}
