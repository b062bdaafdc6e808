//! Photo upload target naming.
//!
//! Photo bytes live in external object storage. The service only decides
//! where a user's upload goes: `<user_id>/<unix_millis>.<ext>`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::validation::normalize_photo_extension;
use uuid::Uuid;
use validator::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PhotoUploadTarget {
    pub object_path: String,
    pub public_url: String,
}

pub fn photo_object_path(user_id: Uuid, at: DateTime<Utc>, extension: &str) -> String {
    format!("{}/{}.{}", user_id, at.timestamp_millis(), extension)
}

pub fn photo_public_url(base_url: &str, bucket: &str, object_path: &str) -> String {
    format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        bucket.trim_matches('/'),
        object_path
    )
}

/// Builds the upload target for `user_id`, rejecting unsupported extensions.
pub fn upload_target(
    user_id: Uuid,
    at: DateTime<Utc>,
    extension: &str,
    base_url: &str,
    bucket: &str,
) -> Result<PhotoUploadTarget, ValidationError> {
    let extension = normalize_photo_extension(extension)?;
    let object_path = photo_object_path(user_id, at, &extension);
    let public_url = photo_public_url(base_url, bucket, &object_path);
    Ok(PhotoUploadTarget {
        object_path,
        public_url,
    })
}
