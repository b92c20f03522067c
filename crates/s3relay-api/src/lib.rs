//! s3relay API Library
//!
//! This crate provides the HTTP handlers and application setup for the upload
//! relay: the admin settings endpoints and the two upload entry points.

pub mod constants;
pub mod error;
mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;
mod utils;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
