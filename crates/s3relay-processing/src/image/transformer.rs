//! Image transformer: decode, crop-resize to a square, re-encode.

use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use s3relay_core::{AppError, BoxError};
use s3relay_storage::extension_of;
use std::io::Cursor;

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("Failed to read image data: {0}")]
    Read(#[source] BoxError),

    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Invalid target dimension: {0}")]
    InvalidDimension(u32),

    #[error("Image task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<TransformError> for AppError {
    fn from(err: TransformError) -> Self {
        AppError::transform(err)
    }
}

/// Encoded output of a resize.
#[derive(Debug, Clone)]
pub struct ResizedImage {
    pub data: Bytes,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

pub struct ImageTransformer;

impl ImageTransformer {
    /// Resize to exactly `dimension` x `dimension`, cropping to fill.
    ///
    /// The output is encoded in the format named by `filename`'s extension when
    /// that format can be written, otherwise in the detected input format,
    /// otherwise as PNG.
    pub fn resize_to_square(
        data: &[u8],
        dimension: u32,
        filename: &str,
    ) -> Result<ResizedImage, TransformError> {
        if dimension == 0 {
            return Err(TransformError::InvalidDimension(dimension));
        }

        let reader = image::ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| TransformError::Read(Box::new(e)))?;
        let detected = reader.format();
        let img = reader.decode().map_err(TransformError::Decode)?;

        let resized = img.resize_to_fill(dimension, dimension, FilterType::Lanczos3);
        let format = output_format(filename, detected);
        // JPEG has no alpha channel.
        let resized = if format == ImageFormat::Jpeg {
            DynamicImage::ImageRgb8(resized.to_rgb8())
        } else {
            resized
        };

        let (width, height) = resized.dimensions();
        let mut buffer = Vec::with_capacity(estimated_encoded_size(width, height));
        resized
            .write_to(&mut Cursor::new(&mut buffer), format)
            .map_err(TransformError::Encode)?;

        tracing::debug!(
            width,
            height,
            format = ?format,
            output_bytes = buffer.len(),
            "Image resized"
        );

        Ok(ResizedImage {
            data: Bytes::from(buffer),
            format,
            width,
            height,
        })
    }

    /// Collect `stream` and resize the result on the blocking pool.
    pub async fn resize_stream<S, E>(
        mut stream: S,
        dimension: u32,
        filename: &str,
    ) -> Result<ResizedImage, TransformError>
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin + Send,
        E: Into<BoxError>,
    {
        let mut buffer = BytesMut::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| TransformError::Read(e.into()))?;
            buffer.extend_from_slice(&chunk);
        }

        let data = buffer.freeze();
        let filename = filename.to_string();
        tokio::task::spawn_blocking(move || Self::resize_to_square(&data, dimension, &filename))
            .await?
    }

    /// MIME type of an output format.
    pub fn content_type(format: ImageFormat) -> &'static str {
        format.to_mime_type()
    }
}

fn output_format(filename: &str, detected: Option<ImageFormat>) -> ImageFormat {
    let extension = extension_of(filename).trim_start_matches('.');
    ImageFormat::from_extension(extension)
        .filter(|f| is_writable(*f))
        .or_else(|| detected.filter(|f| is_writable(*f)))
        .unwrap_or(ImageFormat::Png)
}

/// Upper-bound guess of the encoded size: 3 bytes per pixel.
fn estimated_encoded_size(width: u32, height: u32) -> usize {
    width as usize * height as usize * 3
}

fn is_writable(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Gif | ImageFormat::WebP
    )
}
