//! Shared constants

/// Identity used to namespace persisted settings and to prefix every error message.
pub const PLUGIN_ID: &str = "s3relay-s3-uploads";

/// Host used for public URLs when no host is configured: `https://{bucket}.s3.amazonaws.com`.
pub const AWS_S3_HOST: &str = "s3.amazonaws.com";

/// Region handed to the S3 client when none is configured.
pub const FALLBACK_REGION: &str = "us-east-1";

/// Target edge, in pixels, for resized remote images when the policy value is unusable.
pub const DEFAULT_PROFILE_IMAGE_DIMENSION: u32 = 128;

/// Content type for files whose extension has no MIME mapping.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Persisted setting keys. They match the field names of the admin forms.
pub mod keys {
    pub const ACCESS_KEY_ID: &str = "accessKeyId";
    pub const SECRET_ACCESS_KEY: &str = "secretAccessKey";
    pub const REGION: &str = "region";
    pub const ACL: &str = "acl";
    pub const BUCKET: &str = "bucket";
    pub const ENDPOINT: &str = "endpoint";
    pub const HOST: &str = "host";
    pub const PATH: &str = "path";

    pub const ALL: [&str; 8] = [
        ACCESS_KEY_ID,
        SECRET_ACCESS_KEY,
        REGION,
        ACL,
        BUCKET,
        ENDPOINT,
        HOST,
        PATH,
    ];
}
