//! Image processing module
//!
//! Square thumbnails for remote images.

pub mod transformer;

pub use transformer::{ImageTransformer, ResizedImage, TransformError};
