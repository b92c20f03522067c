//! Test helpers: an upload service wired to in-memory collaborators.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
use s3relay_core::constants::PLUGIN_ID;
use s3relay_core::{AppError, EnvDefaults, UploadPolicy};
use s3relay_services::services::fetch::ByteStream;
use s3relay_services::{
    InMemorySettingsRepository, RemoteFetcher, SettingsResolver, UploadService,
};
use s3relay_storage::MemoryObjectStore;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

/// Serves fixed bodies by URL and records every request.
#[derive(Clone, Default)]
pub struct StaticFetcher {
    bodies: Arc<Mutex<HashMap<String, Bytes>>>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl StaticFetcher {
    pub fn serve(&self, url: &str, body: Vec<u8>) {
        self.bodies
            .lock()
            .unwrap()
            .insert(url.to_string(), Bytes::from(body));
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteFetcher for StaticFetcher {
    async fn fetch(&self, url: &reqwest::Url) -> Result<ByteStream, AppError> {
        self.requested.lock().unwrap().push(url.to_string());
        let body = self
            .bodies
            .lock()
            .unwrap()
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| AppError::InvalidInput("URL returned status code: 404".to_string()))?;

        // Split into several chunks so the transformer has to accumulate them.
        let chunks: Vec<Result<Bytes, s3relay_core::BoxError>> = body
            .chunks(64)
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();
        Ok(Box::pin(stream::iter(chunks)))
    }
}

pub struct TestUploads {
    pub service: UploadService,
    pub resolver: Arc<SettingsResolver>,
    pub repository: InMemorySettingsRepository,
    pub store: MemoryObjectStore,
    pub fetcher: StaticFetcher,
}

/// Build an upload service over in-memory settings seeded with `settings`.
pub async fn setup_uploads(settings: &[(&str, &str)], policy: UploadPolicy) -> TestUploads {
    setup_uploads_with_env(settings, policy, EnvDefaults::default()).await
}

/// Same as [`setup_uploads`] with explicit environment defaults.
pub async fn setup_uploads_with_env(
    settings: &[(&str, &str)],
    policy: UploadPolicy,
    env_defaults: EnvDefaults,
) -> TestUploads {
    let repository = InMemorySettingsRepository::with_fields(PLUGIN_ID, settings);
    let resolver = Arc::new(SettingsResolver::new(
        Arc::new(repository.clone()),
        env_defaults,
    ));
    resolver.fetch().await.expect("initial settings fetch");

    let store = MemoryObjectStore::new();
    let fetcher = StaticFetcher::default();
    let service = UploadService::new(
        resolver.clone(),
        &policy,
        Arc::new(store.clone()),
        Arc::new(fetcher.clone()),
    );

    TestUploads {
        service,
        resolver,
        repository,
        store,
        fetcher,
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgba([(x % 255) as u8, (y % 255) as u8, 200, 255])
    });
    let mut buffer = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        image::Rgb([(x % 255) as u8, (y % 255) as u8, 90])
    });
    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)
        .unwrap();
    buffer
}
