//! API route prefixes.

/// Upload endpoints prefix
pub const API_PREFIX: &str = "/api/v0";

/// Admin settings endpoints prefix
pub const ADMIN_PREFIX: &str = "/api/admin/plugins/s3-uploads";

/// Confirmation returned by the admin settings endpoints.
pub const SAVED_MESSAGE: &str = "Saved!";

/// Request body cap used when no maximum file size is configured.
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 100 * 1024 * 1024;

/// Allowance for multipart framing on top of the maximum file size.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;
