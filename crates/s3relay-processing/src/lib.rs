//! s3relay processing: upload validation and image transformation.

#[cfg(feature = "image")]
pub mod image;
pub mod validator;

#[cfg(feature = "image")]
pub use crate::image::{ImageTransformer, ResizedImage, TransformError};
pub use validator::{is_extension_allowed, UploadValidator, ValidationError};
