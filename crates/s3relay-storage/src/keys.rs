//! Storage key generation.

use uuid::Uuid;

/// Extension of a filename, including the leading dot.
///
/// Only the final path segment is considered. A single leading dot does not
/// start an extension (`.profile` has none, `..foo` has `.foo`), `..` has
/// none, and a trailing dot yields `"."`.
pub fn extension_of(filename: &str) -> &str {
    let base = filename.rsplit('/').next().unwrap_or(filename);
    if base == ".." {
        return "";
    }
    match base.rfind('.') {
        Some(idx) if idx > 0 => &base[idx..],
        _ => "",
    }
}

/// Generate a fresh storage key for `filename` under the configured `path`.
///
/// The path gets a trailing `/` when missing (an empty path becomes `/`),
/// leading slashes are then removed, and a random UUID plus the original
/// extension are appended.
pub fn generate_storage_key(path: &str, filename: &str) -> String {
    let mut prefix = if path.is_empty() {
        "/".to_string()
    } else if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    };
    prefix = prefix.trim_start_matches('/').to_string();

    format!("{}{}{}", prefix, Uuid::new_v4(), extension_of(filename))
}
