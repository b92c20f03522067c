//! Remote image fetching.

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use s3relay_core::{AppError, BoxError};
use std::pin::Pin;

/// Body of a remote resource, chunk by chunk.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, BoxError>> + Send>>;

#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    /// Open `url` and return its body. Only called with http(s) URLs.
    async fn fetch(&self, url: &reqwest::Url) -> Result<ByteStream, AppError>;
}

/// Parse an upload URL, accepting only http and https.
pub fn parse_remote_url(url: &str) -> Result<reqwest::Url, AppError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(AppError::InvalidInput("url is required".to_string()));
    }

    let parsed = reqwest::Url::parse(url)
        .map_err(|_| AppError::InvalidInput(format!("Invalid URL format: {}", url)))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(AppError::InvalidInput(
            "Only HTTP and HTTPS URLs are allowed".to_string(),
        ));
    }
    Ok(parsed)
}

/// Final path segment of the URL, query and fragment excluded.
pub fn remote_filename(url: &reqwest::Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default()
        .to_string()
}

/// reqwest-backed fetcher. The body is streamed, never buffered here.
#[derive(Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn fetch(&self, url: &reqwest::Url) -> Result<ByteStream, AppError> {
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            tracing::debug!(error = %e, url = %url, "Failed to download from URL");
            AppError::InvalidInput(format!("Failed to download from URL: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(AppError::InvalidInput(format!(
                "URL returned status code: {}",
                response.status()
            )));
        }

        Ok(Box::pin(
            response
                .bytes_stream()
                .map(|chunk| chunk.map_err(|e| Box::new(e) as BoxError)),
        ))
    }
}
