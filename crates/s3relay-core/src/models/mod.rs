//! Data models for the application

mod settings;
mod upload;

pub use settings::*;
pub use upload::*;
