//! Database repositories for the data access layer
//
// Plugin settings (namespace/key/value)
pub mod settings;

pub use settings::{InMemorySettingsRepository, PgSettingsRepository, SettingsRepository};
