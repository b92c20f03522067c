//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p s3relay-api`. Settings, object
//! store and remote fetching are all in memory; no network or database.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use bytes::Bytes;
use futures::stream;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
use s3relay_api::constants;
use s3relay_api::setup::routes;
use s3relay_api::state::AppState;
use s3relay_core::constants::PLUGIN_ID;
use s3relay_core::{AppError, BoxError, EnvDefaults, RelayConfig, UploadPolicy};
use s3relay_services::services::fetch::ByteStream;
use s3relay_services::{
    InMemorySettingsRepository, RemoteFetcher, SettingsResolver, UploadService,
};
use s3relay_storage::MemoryObjectStore;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// Upload path under the API prefix (e.g. `/api/v0/uploads/file`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Admin settings path (e.g. `/api/admin/plugins/s3-uploads/credentials`).
pub fn admin_path(path: &str) -> String {
    format!("{}{}", constants::ADMIN_PREFIX, path)
}

/// Serves fixed bodies by URL.
#[derive(Clone, Default)]
pub struct StaticFetcher {
    bodies: Arc<Mutex<HashMap<String, Bytes>>>,
}

impl StaticFetcher {
    pub fn serve(&self, url: &str, body: Vec<u8>) {
        self.bodies
            .lock()
            .unwrap()
            .insert(url.to_string(), Bytes::from(body));
    }
}

#[async_trait]
impl RemoteFetcher for StaticFetcher {
    async fn fetch(&self, url: &reqwest::Url) -> Result<ByteStream, AppError> {
        let body = self
            .bodies
            .lock()
            .unwrap()
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| AppError::InvalidInput("URL returned status code: 404".to_string()))?;
        let chunks: Vec<Result<Bytes, BoxError>> = vec![Ok(body)];
        Ok(Box::pin(stream::iter(chunks)))
    }
}

/// Test application: server plus handles on its in-memory collaborators.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub repository: InMemorySettingsRepository,
    pub store: MemoryObjectStore,
    pub fetcher: StaticFetcher,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Setup a test app with default upload policy and the given persisted settings.
pub async fn setup_test_app(settings: &[(&str, &str)]) -> TestApp {
    setup_test_app_with_policy(settings, UploadPolicy::default()).await
}

pub async fn setup_test_app_with_policy(
    settings: &[(&str, &str)],
    policy: UploadPolicy,
) -> TestApp {
    let config = RelayConfig {
        environment: "test".to_string(),
        settings_refresh_interval_secs: 0,
        upload_policy: policy,
        env_defaults: EnvDefaults {
            region: "us-east-1".to_string(),
            ..Default::default()
        },
        ..RelayConfig::default()
    };

    let repository = InMemorySettingsRepository::with_fields(PLUGIN_ID, settings);
    let resolver = Arc::new(SettingsResolver::new(
        Arc::new(repository.clone()),
        config.env_defaults.clone(),
    ));
    resolver.fetch().await.expect("initial settings fetch");

    let store = MemoryObjectStore::new();
    let fetcher = StaticFetcher::default();
    let uploads = UploadService::new(
        resolver.clone(),
        &config.upload_policy,
        Arc::new(store.clone()),
        Arc::new(fetcher.clone()),
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        settings: resolver,
        uploads,
        background: CancellationToken::new(),
    });

    let app = routes::setup_routes(&config, state.clone());
    let server = TestServer::new(app).expect("Failed to create test server");

    TestApp {
        server,
        state,
        repository,
        store,
        fetcher,
    }
}

pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgba([(x % 255) as u8, (y % 255) as u8, 128, 255])
    });
    let mut buffer = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}
