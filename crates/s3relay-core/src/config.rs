//! Configuration module
//!
//! Process configuration read once at startup: server settings, the upload
//! policy supplied by the host, and the environment defaults that back the
//! persisted bucket settings.

use std::env;

use serde::Deserialize;

use crate::models::UploadPolicy;

// Common constants
const SERVER_PORT: u16 = 3000;
const SETTINGS_REFRESH_INTERVAL_SECS: u64 = 30;

/// Environment fallbacks for the bucket settings.
///
/// Credentials are intentionally absent: they are only ever read from the
/// settings store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct EnvDefaults {
    #[serde(default, rename = "aws_default_region")]
    pub region: String,
    #[serde(default, rename = "s3_uploads_acl")]
    pub acl: String,
    #[serde(default, rename = "s3_uploads_bucket")]
    pub bucket: String,
    #[serde(default, rename = "s3_uploads_endpoint")]
    pub endpoint: String,
    #[serde(default, rename = "s3_uploads_host")]
    pub host: String,
    #[serde(default, rename = "s3_uploads_path")]
    pub path: String,
}

impl EnvDefaults {
    /// Read `AWS_DEFAULT_REGION`, `S3_UPLOADS_ACL`, `S3_UPLOADS_BUCKET`,
    /// `S3_UPLOADS_ENDPOINT`, `S3_UPLOADS_HOST` and `S3_UPLOADS_PATH`.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env::<EnvDefaults>()
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct RelayConfig {
    pub server_port: u16,
    pub environment: String,
    /// Postgres connection string for the settings store. When unset the
    /// settings live in memory for the lifetime of the process.
    pub database_url: Option<String>,
    /// Interval of the background settings refresh. 0 disables it.
    pub settings_refresh_interval_secs: u64,
    pub upload_policy: UploadPolicy,
    pub env_defaults: EnvDefaults,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            environment: "development".to_string(),
            database_url: None,
            settings_refresh_interval_secs: SETTINGS_REFRESH_INTERVAL_SECS,
            upload_policy: UploadPolicy::default(),
            env_defaults: EnvDefaults::default(),
        }
    }
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let allowed_extensions: Vec<String> = env::var("ALLOWED_FILE_EXTENSIONS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.to_string())
            .collect();

        let maximum_file_size_kb = match env::var("MAXIMUM_FILE_SIZE") {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(kb) => Some(kb),
                Err(_) => {
                    tracing::warn!(value = %raw, "MAXIMUM_FILE_SIZE is not a number, size limit disabled");
                    None
                }
            },
            Err(_) => None,
        };

        let profile_image_dimension =
            UploadPolicy::parse_dimension(env::var("PROFILE_IMAGE_DIMENSION").ok().as_deref());

        let config = RelayConfig {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .unwrap_or(SERVER_PORT),
            environment,
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            settings_refresh_interval_secs: env::var("SETTINGS_REFRESH_INTERVAL_SECS")
                .unwrap_or_else(|_| SETTINGS_REFRESH_INTERVAL_SECS.to_string())
                .parse()
                .unwrap_or(SETTINGS_REFRESH_INTERVAL_SECS),
            upload_policy: UploadPolicy::new(
                allowed_extensions,
                maximum_file_size_kb,
                profile_image_dimension,
            ),
            env_defaults: EnvDefaults::from_env()?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if let Some(ref url) = self.database_url {
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be a valid PostgreSQL connection string"
                ));
            }
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_database(url: Option<&str>) -> RelayConfig {
        RelayConfig {
            server_port: SERVER_PORT,
            environment: "test".to_string(),
            database_url: url.map(String::from),
            settings_refresh_interval_secs: 0,
            upload_policy: UploadPolicy::default(),
            env_defaults: EnvDefaults::default(),
        }
    }

    #[test]
    fn test_validate_accepts_missing_database() {
        assert!(config_with_database(None).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_postgres_url() {
        assert!(config_with_database(Some("mysql://localhost/db"))
            .validate()
            .is_err());
        assert!(config_with_database(Some("postgresql://localhost/db"))
            .validate()
            .is_ok());
    }

    #[test]
    fn test_env_defaults_deserialize_from_pairs() {
        let vars = vec![
            ("S3_UPLOADS_BUCKET".to_string(), "mybucket".to_string()),
            ("AWS_DEFAULT_REGION".to_string(), "us-west-2".to_string()),
            ("AWS_ACCESS_KEY_ID".to_string(), "ignored".to_string()),
        ];
        let defaults: EnvDefaults = envy::from_iter(vars).unwrap();
        assert_eq!(defaults.bucket, "mybucket");
        assert_eq!(defaults.region, "us-west-2");
        assert_eq!(defaults.host, "");
    }
}
