use s3relay_core::constants::DEFAULT_CONTENT_TYPE;

/// MIME type to store an object under, guessed from its filename.
pub fn content_type_for(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_raw()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string()
}
