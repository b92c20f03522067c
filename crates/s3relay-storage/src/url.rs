//! Public URL construction for stored objects.

use s3relay_core::constants::AWS_S3_HOST;
use s3relay_core::S3Settings;

/// Public URL of `key` in the bucket described by `settings`.
///
/// With a configured host the URL is `{host}/{key}`, where `http://` is
/// prepended to a host without a scheme. A host that is a bare AWS S3 service
/// endpoint gets the bucket as the first path segment. Without a host the
/// virtual-hosted AWS form `https://{bucket}.s3.amazonaws.com/{key}` is used.
pub fn public_url(settings: &S3Settings, key: &str) -> String {
    let host = settings.host.trim();
    if host.is_empty() {
        return format!("https://{}.{}/{}", settings.bucket, AWS_S3_HOST, key);
    }

    let base = if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    };
    let base = base.trim_end_matches('/');

    if is_aws_service_host(base) {
        format!("{}/{}/{}", base, settings.bucket, key)
    } else {
        format!("{}/{}", base, key)
    }
}

/// `s3.amazonaws.com`, `s3.<region>.amazonaws.com` or `s3-<region>.amazonaws.com`.
fn is_aws_service_host(base: &str) -> bool {
    let authority = base
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(base);
    if authority.contains('/') {
        return false;
    }
    let hostname = authority
        .split(':')
        .next()
        .unwrap_or(authority)
        .to_ascii_lowercase();

    if hostname == AWS_S3_HOST {
        return true;
    }
    let Some(region) = hostname.strip_suffix(".amazonaws.com") else {
        return false;
    };
    let region = region
        .strip_prefix("s3.")
        .or_else(|| region.strip_prefix("s3-"));
    matches!(region, Some(r) if !r.is_empty() && !r.contains('.'))
}
