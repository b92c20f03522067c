//! Settings persistence for s3relay.
//!
//! Settings are stored as string key/value pairs grouped under a namespace.
//! [`PgSettingsRepository`] keeps them in PostgreSQL, [`InMemorySettingsRepository`]
//! keeps them for the lifetime of the process.

pub mod db;

pub use db::{InMemorySettingsRepository, PgSettingsRepository, SettingsRepository};
