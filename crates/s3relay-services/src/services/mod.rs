pub mod fetch;
pub mod settings;
pub mod upload;
pub mod uploader;
