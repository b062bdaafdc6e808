//! Profile domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

/// Review state of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStatus {
    Incomplete,
    PendingReview,
    Approved,
    Rejected,
}

impl ProfileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileStatus::Incomplete => "incomplete",
            ProfileStatus::PendingReview => "pending_review",
            ProfileStatus::Approved => "approved",
            ProfileStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for ProfileStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incomplete" => Ok(ProfileStatus::Incomplete),
            "pending_review" => Ok(ProfileStatus::PendingReview),
            "approved" => Ok(ProfileStatus::Approved),
            "rejected" => Ok(ProfileStatus::Rejected),
            _ => Err(format!("Invalid profile status: {}", s)),
        }
    }
}

impl fmt::Display for ProfileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role of a profile's owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::User => write!(f, "user"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// A user's matchmaking profile and its review state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub bio: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub location: Option<String>,
    pub photo_url: Option<String>,
    pub religious_info: Value,
    pub preferences: Value,
    pub profile_status: ProfileStatus,
    pub role: UserRole,
    pub rejection_reason: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Public subset of a profile shown to other users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProfileSummary {
    pub id: Uuid,
    pub name: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub photo_url: Option<String>,
}

/// Profile form submitted for review.
///
/// Every field is optional on the wire so that a missing required field is
/// reported as a validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SubmitProfileRequest {
    #[validate(
        length(max = 100, message = "Name must be at most 100 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    #[serde(default)]
    pub name: Option<String>,
    #[validate(custom(function = "shared::validation::validate_photo_url"))]
    #[serde(default)]
    pub photo_url: Option<String>,
    #[validate(
        required(message = "Bio is required"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    #[serde(default)]
    pub bio: Option<String>,
    #[validate(
        required(message = "Date of birth is required"),
        custom(function = "shared::validation::validate_date_of_birth")
    )]
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[validate(required(message = "Gender is required"))]
    #[serde(default)]
    pub gender: Option<Gender>,
    #[validate(
        required(message = "Location is required"),
        length(max = 200, message = "Location must be at most 200 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    #[serde(default)]
    pub location: Option<String>,
    #[validate(custom(function = "shared::validation::validate_attribute_bag"))]
    #[serde(default)]
    pub religious_info: Option<Value>,
    #[validate(custom(function = "shared::validation::validate_attribute_bag"))]
    #[serde(default)]
    pub preferences: Option<Value>,
}

/// A submission that passed validation; required fields are present.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSubmission {
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub bio: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub location: String,
    pub religious_info: Value,
    pub preferences: Value,
}

/// Runs the derived rules, then the configurable bio limit.
fn validate_with_bio_limit<T: Validate>(
    request: &T,
    bio: Option<&str>,
    max_bio_length: usize,
) -> Result<(), ValidationErrors> {
    let mut errors = request.validate().err().unwrap_or_else(ValidationErrors::new);

    if bio.is_some_and(|b| b.trim().chars().count() > max_bio_length) {
        let mut err = ValidationError::new("length");
        err.message = Some(format!("Bio must be at most {} characters", max_bio_length).into());
        errors.add("bio", err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn empty_bag() -> Value {
    Value::Object(Default::default())
}

impl SubmitProfileRequest {
    /// Validates the form for submission.
    ///
    /// Bio, date of birth, gender and location are required; the photo is
    /// optional. Attribute bags default to empty objects.
    pub fn validate_submission(
        &self,
        max_bio_length: usize,
    ) -> Result<ProfileSubmission, ValidationErrors> {
        validate_with_bio_limit(self, self.bio.as_deref(), max_bio_length)?;

        match (&self.bio, self.date_of_birth, self.gender, &self.location) {
            (Some(bio), Some(date_of_birth), Some(gender), Some(location)) => {
                Ok(ProfileSubmission {
                    name: self.name.as_deref().map(|n| n.trim().to_string()),
                    photo_url: self.photo_url.clone(),
                    bio: bio.trim().to_string(),
                    date_of_birth,
                    gender,
                    location: location.trim().to_string(),
                    religious_info: self.religious_info.clone().unwrap_or_else(empty_bag),
                    preferences: self.preferences.clone().unwrap_or_else(empty_bag),
                })
            }
            // `required` on each of these already failed above.
            _ => Err(ValidationErrors::new()),
        }
    }
}

/// Partial profile update. Status and role are not editable here.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateProfileRequest {
    #[validate(
        length(max = 100, message = "Name must be at most 100 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    #[serde(default)]
    pub name: Option<String>,
    #[validate(custom(function = "shared::validation::validate_photo_url"))]
    #[serde(default)]
    pub photo_url: Option<String>,
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    #[serde(default)]
    pub bio: Option<String>,
    #[validate(custom(function = "shared::validation::validate_date_of_birth"))]
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[validate(
        length(max = 200, message = "Location must be at most 200 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    #[serde(default)]
    pub location: Option<String>,
    #[validate(custom(function = "shared::validation::validate_attribute_bag"))]
    #[serde(default)]
    pub religious_info: Option<Value>,
    #[validate(custom(function = "shared::validation::validate_attribute_bag"))]
    #[serde(default)]
    pub preferences: Option<Value>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.photo_url.is_none()
            && self.bio.is_none()
            && self.date_of_birth.is_none()
            && self.gender.is_none()
            && self.location.is_none()
            && self.religious_info.is_none()
            && self.preferences.is_none()
    }

    /// Validates only the fields that are present.
    pub fn validate_update(&self, max_bio_length: usize) -> Result<(), ValidationErrors> {
        validate_with_bio_limit(self, self.bio.as_deref(), max_bio_length)
    }
}

/// Admin rejection payload.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct RejectProfileRequest {
    #[validate(length(max = 500, message = "Reason must be at most 500 characters"))]
    #[serde(default)]
    pub reason: Option<String>,
}

impl RejectProfileRequest {
    /// Returns the reason, treating blank input as no reason.
    pub fn normalized_reason(&self) -> Option<String> {
        self.reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
    }
}

/// Response after a profile status change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ProfileActionResponse {
    pub success: bool,
    pub profile_id: Uuid,
    pub profile_status: ProfileStatus,
}

/// Response listing profiles awaiting review.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PendingProfilesResponse {
    pub profiles: Vec<Profile>,
    pub total: usize,
}
