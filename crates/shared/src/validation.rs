//! Common validation utilities.

use chrono::{NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

/// Oldest accepted date of birth.
const MIN_BIRTH_YEAR: i32 = 1900;

/// Maximum message length in characters.
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Photo file extensions accepted for upload targets.
pub const ALLOWED_PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

lazy_static! {
    static ref HTTP_URL: Regex = Regex::new(r"^https?://[^\s/$.?#][^\s]*$").unwrap();
}

/// Validates that a text field has at least one non-whitespace character.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value cannot be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates a date of birth: not in the future and not before 1900.
pub fn validate_date_of_birth(date: &NaiveDate) -> Result<(), ValidationError> {
    let today = Utc::now().date_naive();

    if *date > today {
        let mut err = ValidationError::new("date_of_birth_future");
        err.message = Some("Date of birth cannot be in the future".into());
        return Err(err);
    }

    if *date < NaiveDate::from_ymd_opt(MIN_BIRTH_YEAR, 1, 1).unwrap_or(NaiveDate::MIN) {
        let mut err = ValidationError::new("date_of_birth_range");
        err.message = Some("Date of birth is too far in the past".into());
        return Err(err);
    }

    Ok(())
}

/// Validates that a photo URL is an absolute http(s) URL.
pub fn validate_photo_url(url: &str) -> Result<(), ValidationError> {
    if HTTP_URL.is_match(url) {
        Ok(())
    } else {
        let mut err = ValidationError::new("photo_url");
        err.message = Some("Photo URL must be an http(s) URL".into());
        Err(err)
    }
}

/// Validates that an open attribute bag is a JSON object.
pub fn validate_attribute_bag(value: &serde_json::Value) -> Result<(), ValidationError> {
    if value.is_object() {
        Ok(())
    } else {
        let mut err = ValidationError::new("attribute_bag");
        err.message = Some("Value must be a JSON object".into());
        Err(err)
    }
}

/// Validates chat message text after trimming: 1 to 2000 characters.
pub fn validate_message_text(text: &str) -> Result<(), ValidationError> {
    let len = text.trim().chars().count();
    if len == 0 {
        let mut err = ValidationError::new("message_empty");
        err.message = Some("Message cannot be empty".into());
        return Err(err);
    }
    if len > MAX_MESSAGE_LENGTH {
        let mut err = ValidationError::new("message_length");
        err.message = Some(format!("Message must be at most {} characters", MAX_MESSAGE_LENGTH).into());
        return Err(err);
    }
    Ok(())
}

/// Normalizes and checks a photo file extension.
///
/// Returns the lowercased extension without a leading dot.
pub fn normalize_photo_extension(ext: &str) -> Result<String, ValidationError> {
    let normalized = ext.trim().trim_start_matches('.').to_ascii_lowercase();
    if ALLOWED_PHOTO_EXTENSIONS.contains(&normalized.as_str()) {
        Ok(normalized)
    } else {
        let mut err = ValidationError::new("photo_extension");
        err.message = Some(
            format!(
                "Photo extension must be one of: {}",
                ALLOWED_PHOTO_EXTENSIONS.join(", ")
            )
            .into(),
        );
        Err(err)
    }
}
