//! Settings repository: string key/value pairs under a namespace.

use s3relay_core::AppError;
use sqlx::{PgPool, Postgres};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Persistent key/value settings grouped by namespace.
#[async_trait::async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Read the requested keys. Keys that were never written are absent
    /// from the returned map.
    async fn get_fields(
        &self,
        namespace: &str,
        keys: &[&str],
    ) -> Result<HashMap<String, String>, AppError>;

    /// Write every field in one operation, replacing existing values.
    async fn set_fields(
        &self,
        namespace: &str,
        fields: &HashMap<String, String>,
    ) -> Result<(), AppError>;
}

#[derive(Debug, sqlx::FromRow)]
struct SettingRow {
    key: String,
    value: String,
}

/// PostgreSQL-backed settings (`plugin_settings` table).
#[derive(Clone)]
pub struct PgSettingsRepository {
    pool: PgPool,
}

impl PgSettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SettingsRepository for PgSettingsRepository {
    #[tracing::instrument(skip(self, keys), fields(db.table = "plugin_settings", count = keys.len()))]
    async fn get_fields(
        &self,
        namespace: &str,
        keys: &[&str],
    ) -> Result<HashMap<String, String>, AppError> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }
        let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        let rows: Vec<SettingRow> = sqlx::query_as::<Postgres, SettingRow>(
            "SELECT key, value FROM plugin_settings WHERE namespace = $1 AND key = ANY($2)",
        )
        .bind(namespace)
        .bind(&keys)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::debug!(error = ?e, namespace, "Failed to read settings");
            AppError::persistence(e)
        })?;

        Ok(rows.into_iter().map(|r| (r.key, r.value)).collect())
    }

    #[tracing::instrument(skip(self, fields), fields(db.table = "plugin_settings", count = fields.len()))]
    async fn set_fields(
        &self,
        namespace: &str,
        fields: &HashMap<String, String>,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::persistence)?;
        for (key, value) in fields {
            sqlx::query(
                r#"
                INSERT INTO plugin_settings (namespace, key, value, updated_at)
                VALUES ($1, $2, $3, NOW())
                ON CONFLICT (namespace, key)
                DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
                "#,
            )
            .bind(namespace)
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::debug!(error = ?e, namespace, key = %key, "Failed to write setting");
                AppError::persistence(e)
            })?;
        }
        tx.commit().await.map_err(AppError::persistence)?;
        Ok(())
    }
}

/// Process-local settings, used when no database is configured and in tests.
#[derive(Clone, Default)]
pub struct InMemorySettingsRepository {
    values: Arc<Mutex<HashMap<(String, String), String>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a namespace with initial values.
    pub fn with_fields(namespace: &str, fields: &[(&str, &str)]) -> Self {
        let repo = Self::new();
        if let Ok(mut values) = repo.values.lock() {
            for (key, value) in fields {
                values.insert((namespace.to_string(), key.to_string()), value.to_string());
            }
        }
        repo
    }

    /// Make every subsequent call fail with a persistence error until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::persistence(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "settings store unavailable",
            )));
        }
        Ok(())
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<(String, String), String>>, AppError> {
        self.values
            .lock()
            .map_err(|_| AppError::persistence(std::io::Error::other("settings lock poisoned")))
    }
}

#[async_trait::async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn get_fields(
        &self,
        namespace: &str,
        keys: &[&str],
    ) -> Result<HashMap<String, String>, AppError> {
        self.check_available()?;
        let values = self.lock()?;
        Ok(keys
            .iter()
            .filter_map(|key| {
                values
                    .get(&(namespace.to_string(), key.to_string()))
                    .map(|value| (key.to_string(), value.clone()))
            })
            .collect())
    }

    async fn set_fields(
        &self,
        namespace: &str,
        fields: &HashMap<String, String>,
    ) -> Result<(), AppError> {
        self.check_available()?;
        let mut values = self.lock()?;
        for (key, value) in fields {
            values.insert((namespace.to_string(), key.clone()), value.clone());
        }
        Ok(())
    }
}
