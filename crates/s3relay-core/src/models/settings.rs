//! Bucket configuration and the admin forms that write it.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::EnvDefaults;
use crate::constants::keys;

/// Active bucket configuration.
///
/// Built from the persisted settings merged over [`EnvDefaults`]. A value is
/// never mutated after construction: a settings fetch produces a new snapshot.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct S3Settings {
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Whether `access_key_id` came from the settings store.
    pub access_key_id_from_store: bool,
    /// Whether `secret_access_key` came from the settings store.
    pub secret_access_key_from_store: bool,
    pub region: String,
    pub acl: String,
    pub bucket: String,
    pub endpoint: String,
    pub host: String,
    pub path: String,
}

impl S3Settings {
    /// Resolve every field from the persisted values and the environment defaults.
    ///
    /// Non-credential fields use the persisted value when non-empty, then the
    /// environment default, then the empty string. Credentials only ever come
    /// from the persisted values.
    pub fn resolve(persisted: &HashMap<String, String>, defaults: &EnvDefaults) -> Self {
        let stored = |key: &str| {
            persisted
                .get(key)
                .filter(|value| !value.is_empty())
                .cloned()
        };
        let field = |key: &str, default: &str| stored(key).unwrap_or_else(|| default.to_string());

        let access_key_id = stored(keys::ACCESS_KEY_ID);
        let secret_access_key = stored(keys::SECRET_ACCESS_KEY);

        S3Settings {
            access_key_id_from_store: access_key_id.is_some(),
            secret_access_key_from_store: secret_access_key.is_some(),
            access_key_id: access_key_id.unwrap_or_default(),
            secret_access_key: secret_access_key.unwrap_or_default(),
            region: field(keys::REGION, &defaults.region),
            acl: field(keys::ACL, &defaults.acl),
            bucket: field(keys::BUCKET, &defaults.bucket),
            endpoint: field(keys::ENDPOINT, &defaults.endpoint),
            host: field(keys::HOST, &defaults.host),
            path: field(keys::PATH, &defaults.path),
        }
    }

    /// Both credentials are present, so the S3 client can use them directly.
    pub fn has_static_credentials(&self) -> bool {
        !self.access_key_id.is_empty() && !self.secret_access_key.is_empty()
    }

    /// ACL to send with each write, if one is configured.
    pub fn acl(&self) -> Option<&str> {
        Some(self.acl.as_str()).filter(|acl| !acl.is_empty())
    }

    /// Settings as shown on the admin page. A credential is echoed back only
    /// when it was loaded from the settings store.
    pub fn admin_view(&self) -> AdminSettingsView {
        AdminSettingsView {
            bucket: self.bucket.clone(),
            host: self.host.clone(),
            endpoint: self.endpoint.clone(),
            path: self.path.clone(),
            region: self.region.clone(),
            acl: self.acl.clone(),
            access_key_id: if self.access_key_id_from_store {
                self.access_key_id.clone()
            } else {
                String::new()
            },
            secret_access_key: if self.secret_access_key_from_store {
                self.secret_access_key.clone()
            } else {
                String::new()
            },
        }
    }
}

// Hand-written so credentials never reach the logs.
impl fmt::Debug for S3Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &str| if value.is_empty() { "" } else { "***" };
        f.debug_struct("S3Settings")
            .field("access_key_id", &redact(&self.access_key_id))
            .field("secret_access_key", &redact(&self.secret_access_key))
            .field("access_key_id_from_store", &self.access_key_id_from_store)
            .field(
                "secret_access_key_from_store",
                &self.secret_access_key_from_store,
            )
            .field("region", &self.region)
            .field("acl", &self.acl)
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint)
            .field("host", &self.host)
            .field("path", &self.path)
            .finish()
    }
}

/// Admin page payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSettingsView {
    pub bucket: String,
    pub host: String,
    pub endpoint: String,
    pub path: String,
    pub region: String,
    pub acl: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Bucket settings form. Missing fields are saved as empty strings, which
/// lets the environment default apply again on the next fetch.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BucketSettingsForm {
    pub bucket: Option<String>,
    pub endpoint: Option<String>,
    pub host: Option<String>,
    pub path: Option<String>,
    pub region: Option<String>,
    pub acl: Option<String>,
}

impl BucketSettingsForm {
    pub fn into_fields(self) -> HashMap<String, String> {
        HashMap::from([
            (keys::BUCKET.to_string(), self.bucket.unwrap_or_default()),
            (keys::ENDPOINT.to_string(), self.endpoint.unwrap_or_default()),
            (keys::HOST.to_string(), self.host.unwrap_or_default()),
            (keys::PATH.to_string(), self.path.unwrap_or_default()),
            (keys::REGION.to_string(), self.region.unwrap_or_default()),
            (keys::ACL.to_string(), self.acl.unwrap_or_default()),
        ])
    }
}

/// Credentials form.
#[derive(Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CredentialsForm {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl CredentialsForm {
    pub fn into_fields(self) -> HashMap<String, String> {
        HashMap::from([
            (
                keys::ACCESS_KEY_ID.to_string(),
                self.access_key_id.unwrap_or_default(),
            ),
            (
                keys::SECRET_ACCESS_KEY.to_string(),
                self.secret_access_key.unwrap_or_default(),
            ),
        ])
    }
}
