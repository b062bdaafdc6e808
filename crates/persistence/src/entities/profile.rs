//! Profile entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::matchmaking::PotentialMatch;
use domain::models::profile::{Gender, Profile, ProfileStatus, ProfileSummary, UserRole};
use domain::services::matchmaking::MatchCandidate;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for profile_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "profile_status", rename_all = "snake_case")]
pub enum ProfileStatusDb {
    Incomplete,
    PendingReview,
    Approved,
    Rejected,
}

impl From<ProfileStatusDb> for ProfileStatus {
    fn from(status: ProfileStatusDb) -> Self {
        match status {
            ProfileStatusDb::Incomplete => ProfileStatus::Incomplete,
            ProfileStatusDb::PendingReview => ProfileStatus::PendingReview,
            ProfileStatusDb::Approved => ProfileStatus::Approved,
            ProfileStatusDb::Rejected => ProfileStatus::Rejected,
        }
    }
}

impl From<ProfileStatus> for ProfileStatusDb {
    fn from(status: ProfileStatus) -> Self {
        match status {
            ProfileStatus::Incomplete => ProfileStatusDb::Incomplete,
            ProfileStatus::PendingReview => ProfileStatusDb::PendingReview,
            ProfileStatus::Approved => ProfileStatusDb::Approved,
            ProfileStatus::Rejected => ProfileStatusDb::Rejected,
        }
    }
}

/// Database enum for user_role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum UserRoleDb {
    User,
    Admin,
}

impl From<UserRoleDb> for UserRole {
    fn from(role: UserRoleDb) -> Self {
        match role {
            UserRoleDb::User => UserRole::User,
            UserRoleDb::Admin => UserRole::Admin,
        }
    }
}

/// Database enum for gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "gender", rename_all = "lowercase")]
pub enum GenderDb {
    Male,
    Female,
}

impl From<GenderDb> for Gender {
    fn from(gender: GenderDb) -> Self {
        match gender {
            GenderDb::Male => Gender::Male,
            GenderDb::Female => Gender::Female,
        }
    }
}

impl From<Gender> for GenderDb {
    fn from(gender: Gender) -> Self {
        match gender {
            Gender::Male => GenderDb::Male,
            Gender::Female => GenderDb::Female,
        }
    }
}

/// Database row mapping for the user_profile table.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileEntity {
    pub id: Uuid,
    pub name: String,
    pub bio: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<GenderDb>,
    pub location: Option<String>,
    pub photo_url: Option<String>,
    pub religious_info: serde_json::Value,
    pub preferences: serde_json::Value,
    pub profile_status: ProfileStatusDb,
    pub role: UserRoleDb,
    pub rejection_reason: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

fn object_or_empty(value: serde_json::Value) -> serde_json::Value {
    if value.is_object() {
        value
    } else {
        serde_json::Value::Object(Default::default())
    }
}

impl From<ProfileEntity> for Profile {
    fn from(entity: ProfileEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            bio: entity.bio,
            date_of_birth: entity.date_of_birth,
            gender: entity.gender.map(Into::into),
            location: entity.location,
            photo_url: entity.photo_url,
            religious_info: object_or_empty(entity.religious_info),
            preferences: object_or_empty(entity.preferences),
            profile_status: entity.profile_status.into(),
            role: entity.role.into(),
            rejection_reason: entity.rejection_reason,
            submitted_at: entity.submitted_at,
            reviewed_at: entity.reviewed_at,
            reviewed_by: entity.reviewed_by,
            created_at: entity.created_at,
        }
    }
}

impl From<&ProfileEntity> for ProfileSummary {
    fn from(entity: &ProfileEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name.clone(),
            bio: entity.bio.clone(),
            location: entity.location.clone(),
            photo_url: entity.photo_url.clone(),
        }
    }
}

impl From<ProfileEntity> for PotentialMatch {
    fn from(entity: ProfileEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            bio: entity.bio,
            location: entity.location,
            date_of_birth: entity.date_of_birth,
            gender: entity.gender.map(Into::into),
            photo_url: entity.photo_url,
            religious_info: object_or_empty(entity.religious_info),
            preferences: object_or_empty(entity.preferences),
            has_existing_request: false,
        }
    }
}

impl MatchCandidate for ProfileEntity {
    fn candidate_id(&self) -> Uuid {
        self.id
    }

    fn candidate_status(&self) -> ProfileStatus {
        self.profile_status.into()
    }
}
