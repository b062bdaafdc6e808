//! Profile repository for database operations.

use domain::models::profile::{ProfileSubmission, UpdateProfileRequest};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{GenderDb, ProfileEntity};
use crate::metrics::QueryTimer;

/// Repository for profile-related database operations.
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Creates a new ProfileRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Find a profile by identity id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_profile_by_id");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            SELECT id, name, bio, date_of_birth, gender, location, photo_url,
                   religious_info, preferences, profile_status, role, rejection_reason,
                   submitted_at, reviewed_at, reviewed_by, created_at
            FROM user_profile
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Returns the caller's profile, creating an incomplete one on first sight.
    pub async fn ensure_exists(
        &self,
        id: Uuid,
        name: Option<&str>,
    ) -> Result<ProfileEntity, sqlx::Error> {
        let timer = QueryTimer::new("ensure_profile_exists");
        sqlx::query(
            r#"
            INSERT INTO user_profile (id, name)
            VALUES ($1, COALESCE($2, ''))
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(name)
        .execute(&self.pool)
        .await?;

        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            SELECT id, name, bio, date_of_birth, gender, location, photo_url,
                   religious_info, preferences, profile_status, role, rejection_reason,
                   submitted_at, reviewed_at, reviewed_by, created_at
            FROM user_profile
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Moves a profile into review.
    ///
    /// Returns `None` when the profile does not exist or is not in a
    /// submittable status; the status guard is part of the UPDATE.
    pub async fn submit(
        &self,
        id: Uuid,
        submission: &ProfileSubmission,
    ) -> Result<Option<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("submit_profile");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            UPDATE user_profile
            SET name = COALESCE($2, name),
                photo_url = COALESCE($3, photo_url),
                bio = $4,
                date_of_birth = $5,
                gender = $6,
                location = $7,
                religious_info = $8,
                preferences = $9,
                profile_status = 'pending_review',
                submitted_at = NOW(),
                rejection_reason = NULL,
                reviewed_at = NULL,
                reviewed_by = NULL
            WHERE id = $1 AND profile_status IN ('incomplete', 'rejected')
            RETURNING id, name, bio, date_of_birth, gender, location, photo_url,
                      religious_info, preferences, profile_status, role, rejection_reason,
                      submitted_at, reviewed_at, reviewed_by, created_at
            "#,
        )
        .bind(id)
        .bind(submission.name.as_deref())
        .bind(submission.photo_url.as_deref())
        .bind(&submission.bio)
        .bind(submission.date_of_birth)
        .bind(GenderDb::from(submission.gender))
        .bind(&submission.location)
        .bind(&submission.religious_info)
        .bind(&submission.preferences)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Writes a complete, already approved profile, creating the row when
    /// missing. Used by the test-data seeder only; it skips the review queue
    /// and leaves `reviewed_by` empty.
    pub async fn upsert_approved(
        &self,
        id: Uuid,
        submission: &ProfileSubmission,
    ) -> Result<ProfileEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_approved_profile");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            INSERT INTO user_profile
                (id, name, photo_url, bio, date_of_birth, gender, location,
                 religious_info, preferences, profile_status, submitted_at, reviewed_at)
            VALUES ($1, COALESCE($2, ''), $3, $4, $5, $6, $7, $8, $9,
                    'approved', NOW(), NOW())
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                photo_url = EXCLUDED.photo_url,
                bio = EXCLUDED.bio,
                date_of_birth = EXCLUDED.date_of_birth,
                gender = EXCLUDED.gender,
                location = EXCLUDED.location,
                religious_info = EXCLUDED.religious_info,
                preferences = EXCLUDED.preferences,
                profile_status = 'approved',
                rejection_reason = NULL,
                submitted_at = NOW(),
                reviewed_at = NOW()
            RETURNING id, name, bio, date_of_birth, gender, location, photo_url,
                      religious_info, preferences, profile_status, role, rejection_reason,
                      submitted_at, reviewed_at, reviewed_by, created_at
            "#,
        )
        .bind(id)
        .bind(submission.name.as_deref())
        .bind(submission.photo_url.as_deref())
        .bind(&submission.bio)
        .bind(submission.date_of_birth)
        .bind(GenderDb::from(submission.gender))
        .bind(&submission.location)
        .bind(&submission.religious_info)
        .bind(&submission.preferences)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Applies a partial update of editable fields. Status and role are
    /// never written here.
    pub async fn update_fields(
        &self,
        id: Uuid,
        update: &UpdateProfileRequest,
    ) -> Result<Option<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_profile_fields");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            UPDATE user_profile
            SET name = COALESCE($2, name),
                photo_url = COALESCE($3, photo_url),
                bio = COALESCE($4, bio),
                date_of_birth = COALESCE($5, date_of_birth),
                gender = COALESCE($6, gender),
                location = COALESCE($7, location),
                religious_info = COALESCE($8, religious_info),
                preferences = COALESCE($9, preferences)
            WHERE id = $1
            RETURNING id, name, bio, date_of_birth, gender, location, photo_url,
                      religious_info, preferences, profile_status, role, rejection_reason,
                      submitted_at, reviewed_at, reviewed_by, created_at
            "#,
        )
        .bind(id)
        .bind(update.name.as_deref().map(str::trim))
        .bind(update.photo_url.as_deref())
        .bind(update.bio.as_deref().map(str::trim))
        .bind(update.date_of_birth)
        .bind(update.gender.map(GenderDb::from))
        .bind(update.location.as_deref().map(str::trim))
        .bind(update.religious_info.as_ref())
        .bind(update.preferences.as_ref())
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Approves a profile under review. Returns `None` if it is missing or
    /// not pending review.
    pub async fn approve(
        &self,
        id: Uuid,
        reviewer: Uuid,
    ) -> Result<Option<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("approve_profile");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            UPDATE user_profile
            SET profile_status = 'approved',
                rejection_reason = NULL,
                reviewed_at = NOW(),
                reviewed_by = $2
            WHERE id = $1 AND profile_status = 'pending_review'
            RETURNING id, name, bio, date_of_birth, gender, location, photo_url,
                      religious_info, preferences, profile_status, role, rejection_reason,
                      submitted_at, reviewed_at, reviewed_by, created_at
            "#,
        )
        .bind(id)
        .bind(reviewer)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Rejects a profile under review with an optional reason.
    pub async fn reject(
        &self,
        id: Uuid,
        reviewer: Uuid,
        reason: Option<&str>,
    ) -> Result<Option<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("reject_profile");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            UPDATE user_profile
            SET profile_status = 'rejected',
                rejection_reason = $3,
                reviewed_at = NOW(),
                reviewed_by = $2
            WHERE id = $1 AND profile_status = 'pending_review'
            RETURNING id, name, bio, date_of_birth, gender, location, photo_url,
                      religious_info, preferences, profile_status, role, rejection_reason,
                      submitted_at, reviewed_at, reviewed_by, created_at
            "#,
        )
        .bind(id)
        .bind(reviewer)
        .bind(reason)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List profiles awaiting review, oldest submission first.
    pub async fn list_pending(&self) -> Result<Vec<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_pending_profiles");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            SELECT id, name, bio, date_of_birth, gender, location, photo_url,
                   religious_info, preferences, profile_status, role, rejection_reason,
                   submitted_at, reviewed_at, reviewed_by, created_at
            FROM user_profile
            WHERE profile_status = 'pending_review'
            ORDER BY submitted_at ASC NULLS LAST, created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List every approved profile in creation order.
    pub async fn list_approved(&self) -> Result<Vec<ProfileEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_approved_profiles");
        let result = sqlx::query_as::<_, ProfileEntity>(
            r#"
            SELECT id, name, bio, date_of_birth, gender, location, photo_url,
                   religious_info, preferences, profile_status, role, rejection_reason,
                   submitted_at, reviewed_at, reviewed_by, created_at
            FROM user_profile
            WHERE profile_status = 'approved'
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
