// src/models/mod.rs

pub mod achievement;
pub mod challenge;
pub mod comment;
pub mod user;
pub mod video;

use url::Url;

/// Validates that a string is a correctly formatted URL.
/// Shared by the models that carry image or media references.
pub fn validate_url_string(url: &str) -> Result<(), validator::ValidationError> {
    if Url::parse(url).is_err() {
        return Err(validator::ValidationError::new("invalid_url"));
    }
    Ok(())
}
