use crate::traits::{ObjectStore, PutObjectRequest, StorageError, StorageResult};
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::retry::RetryConfig;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use s3relay_core::constants::FALLBACK_REGION;
use s3relay_core::S3Settings;

/// S3 object store built from one settings snapshot.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    /// Build a client for the given settings.
    ///
    /// * Region falls back to `us-east-1` when empty.
    /// * A custom endpoint gets `https://` when it has no scheme and forces
    ///   path-style addressing (MinIO, DigitalOcean Spaces, ...).
    /// * Stored credentials are used when both are present, otherwise
    ///   requests go out unsigned. The environment provider chain is never
    ///   consulted.
    /// * Failed requests are not retried.
    pub async fn from_settings(settings: &S3Settings) -> StorageResult<Self> {
        let region = if settings.region.is_empty() {
            FALLBACK_REGION.to_string()
        } else {
            settings.region.clone()
        };
        let region_provider = RegionProviderChain::first_try(aws_config::Region::new(region));

        let loader = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .retry_config(RetryConfig::disabled());

        let loader = match stored_credentials(settings) {
            Some(credentials) => loader.credentials_provider(credentials),
            None => loader.no_credentials(),
        };

        let config = loader.load().await;

        let mut s3_config_builder = aws_sdk_s3::config::Builder::from(&config);
        if let Some(endpoint) = normalize_endpoint(&settings.endpoint) {
            s3_config_builder = s3_config_builder
                .endpoint_url(endpoint)
                .force_path_style(true);
        }

        Ok(S3ObjectStore {
            client: Client::from_conf(s3_config_builder.build()),
        })
    }
}

fn stored_credentials(settings: &S3Settings) -> Option<Credentials> {
    settings.has_static_credentials().then(|| {
        Credentials::new(
            settings.access_key_id.clone(),
            settings.secret_access_key.clone(),
            None,
            None,
            "s3relay-settings",
        )
    })
}

fn normalize_endpoint(endpoint: &str) -> Option<String> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        None
    } else if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Some(endpoint.to_string())
    } else {
        Some(format!("https://{}", endpoint))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, request: PutObjectRequest) -> StorageResult<()> {
        let PutObjectRequest {
            bucket,
            key,
            body,
            content_type,
            acl,
        } = request;

        if bucket.is_empty() {
            return Err(StorageError::ConfigError("bucket is not configured".to_string()));
        }

        let size = body.len();
        let body = ByteStream::from(body);
        let start = std::time::Instant::now();

        let mut put = self
            .client
            .put_object()
            .bucket(&bucket)
            .key(&key)
            .body(body)
            .content_length(size as i64)
            .content_type(&content_type);
        if let Some(ref acl) = acl {
            put = put.acl(ObjectCannedAcl::from(acl.as_str()));
        }

        put.send().await.map_err(|e| {
            tracing::debug!(
                error = %e,
                bucket = %bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            size_bytes = size,
            content_type = %content_type,
            acl = acl.as_deref().unwrap_or(""),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }
}
