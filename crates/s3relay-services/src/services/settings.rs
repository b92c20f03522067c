//! Settings resolver: merges persisted bucket settings over environment
//! defaults and publishes the result as immutable snapshots.

use s3relay_core::constants::{keys, PLUGIN_ID};
use s3relay_core::{AppError, EnvDefaults, S3Settings};
use s3relay_db::SettingsRepository;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;

pub struct SettingsResolver {
    repository: Arc<dyn SettingsRepository>,
    env_defaults: EnvDefaults,
    namespace: String,
    current: watch::Sender<Arc<S3Settings>>,
}

impl SettingsResolver {
    /// The initial snapshot holds the environment defaults only, until the
    /// first [`fetch`](Self::fetch).
    pub fn new(repository: Arc<dyn SettingsRepository>, env_defaults: EnvDefaults) -> Self {
        let initial = S3Settings::resolve(&HashMap::new(), &env_defaults);
        let (current, _) = watch::channel(Arc::new(initial));
        Self {
            repository,
            env_defaults,
            namespace: PLUGIN_ID.to_string(),
            current,
        }
    }

    /// Reload the persisted settings and publish a new snapshot.
    ///
    /// On a read failure the previous snapshot stays current and the error
    /// is returned for the caller to report.
    #[tracing::instrument(skip(self), fields(namespace = %self.namespace))]
    pub async fn fetch(&self) -> Result<Arc<S3Settings>, AppError> {
        let persisted = self
            .repository
            .get_fields(&self.namespace, &keys::ALL)
            .await?;

        let settings = Arc::new(S3Settings::resolve(&persisted, &self.env_defaults));
        self.current.send_replace(settings.clone());
        tracing::debug!(settings = ?settings, "Settings snapshot published");
        Ok(settings)
    }

    /// Persist the given fields, then re-fetch.
    #[tracing::instrument(skip(self, fields), fields(namespace = %self.namespace, count = fields.len()))]
    pub async fn save(&self, fields: HashMap<String, String>) -> Result<Arc<S3Settings>, AppError> {
        if let Some(unknown) = fields.keys().find(|k| !keys::ALL.contains(&k.as_str())) {
            return Err(AppError::InvalidInput(format!(
                "unknown setting \"{}\"",
                unknown
            )));
        }

        self.repository
            .set_fields(&self.namespace, &fields)
            .await?;
        tracing::info!("Settings saved");

        self.fetch().await
    }

    /// Current snapshot. Callers keep it for the whole operation.
    pub fn snapshot(&self) -> Arc<S3Settings> {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<S3Settings>> {
        self.current.subscribe()
    }

    /// Re-fetch every `period` until `cancel_token` fires. Failures are
    /// logged and the previous snapshot is kept.
    pub fn spawn_refresh(
        self: &Arc<Self>,
        period: Duration,
        cancel_token: CancellationToken,
    ) -> JoinHandle<()> {
        let resolver = Arc::clone(self);
        let mut interval = interval(period);

        tokio::spawn(async move {
            // The first tick completes immediately; startup already fetched.
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => {
                        tracing::debug!("Settings refresh stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        if let Err(e) = resolver.fetch().await {
                            tracing::warn!(error = %e, "Settings refresh failed, keeping previous snapshot");
                        }
                    }
                }
            }
        })
    }
}
