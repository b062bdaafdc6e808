//! Admin review routes.
//!
//! The `/admin` area gate already sent non-admins away; every handler still
//! checks the role itself before mutating anything.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::chat::{ChatRoom, ADMIN_TEST_CHAT_NAME};
use domain::models::profile::{
    PendingProfilesResponse, Profile, ProfileActionResponse, RejectProfileRequest, UserRole,
};
use domain::services::policy;
use domain::services::profile_status::{self, ProfileTransition};
use domain::services::ProfileStatusEvent;
use persistence::entities::ProfileEntity;
use persistence::repositories::{ChatRepository, ProfileRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::{record_profile_review, record_status_events_delivered};

async fn caller_role(repo: &ProfileRepository, user_id: Uuid) -> Result<UserRole, ApiError> {
    Ok(repo
        .find_by_id(user_id)
        .await?
        .map(|p| p.role.into())
        .unwrap_or(UserRole::User))
}

async fn require_reviewer(repo: &ProfileRepository, user: &UserAuth) -> Result<(), ApiError> {
    policy::authorize_review(caller_role(repo, user.user_id).await?)?;
    Ok(())
}

/// Explains why a guarded review update matched no row.
async fn review_refusal(
    repo: &ProfileRepository,
    profile_id: Uuid,
    transition: ProfileTransition,
) -> ApiError {
    match repo.find_by_id(profile_id).await {
        Ok(Some(profile)) => match profile_status::apply(profile.profile_status.into(), transition)
        {
            Err(e) => e.into(),
            Ok(_) => ApiError::InvalidState("Profile changed during review, retry".to_string()),
        },
        Ok(None) => ApiError::NotFound("Profile not found".to_string()),
        Err(e) => e.into(),
    }
}

fn publish_review(state: &AppState, profile: &Profile, transition: ProfileTransition) {
    record_profile_review(transition.as_str());
    let delivered = state.status_hub.publish(ProfileStatusEvent::new(
        profile.id,
        profile.profile_status,
        profile.rejection_reason.clone(),
    ));
    record_status_events_delivered(delivered);
}

/// Profiles awaiting review, oldest submission first.
///
/// GET /api/v1/admin/profiles/pending
pub async fn list_pending_profiles(
    State(state): State<AppState>,
    user: UserAuth,
) -> Result<Json<PendingProfilesResponse>, ApiError> {
    let repo = ProfileRepository::new(state.pool.clone());
    require_reviewer(&repo, &user).await?;

    let profiles: Vec<Profile> = repo
        .list_pending()
        .await?
        .into_iter()
        .map(ProfileEntity::into)
        .collect();
    let total = profiles.len();

    Ok(Json(PendingProfilesResponse { profiles, total }))
}

/// POST /api/v1/admin/profiles/:profile_id/approve
pub async fn approve_profile(
    State(state): State<AppState>,
    user: UserAuth,
    Path(profile_id): Path<Uuid>,
) -> Result<Json<ProfileActionResponse>, ApiError> {
    let repo = ProfileRepository::new(state.pool.clone());
    require_reviewer(&repo, &user).await?;

    let Some(updated) = repo.approve(profile_id, user.user_id).await? else {
        return Err(review_refusal(&repo, profile_id, ProfileTransition::Approve).await);
    };
    let profile: Profile = updated.into();

    info!(profile_id = %profile_id, reviewer = %user.user_id, "Profile approved");
    publish_review(&state, &profile, ProfileTransition::Approve);

    Ok(Json(ProfileActionResponse {
        success: true,
        profile_id,
        profile_status: profile.profile_status,
    }))
}

/// POST /api/v1/admin/profiles/:profile_id/reject
pub async fn reject_profile(
    State(state): State<AppState>,
    user: UserAuth,
    Path(profile_id): Path<Uuid>,
    body: Option<Json<RejectProfileRequest>>,
) -> Result<Json<ProfileActionResponse>, ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    request.validate()?;

    let repo = ProfileRepository::new(state.pool.clone());
    require_reviewer(&repo, &user).await?;

    let reason = request.normalized_reason();
    let Some(updated) = repo
        .reject(profile_id, user.user_id, reason.as_deref())
        .await?
    else {
        return Err(review_refusal(&repo, profile_id, ProfileTransition::Reject).await);
    };
    let profile: Profile = updated.into();

    info!(
        profile_id = %profile_id,
        reviewer = %user.user_id,
        has_reason = reason.is_some(),
        "Profile rejected"
    );
    publish_review(&state, &profile, ProfileTransition::Reject);

    Ok(Json(ProfileActionResponse {
        success: true,
        profile_id,
        profile_status: profile.profile_status,
    }))
}

/// Private room for admins to try the chat UI on their own.
///
/// POST /api/v1/admin/test-chat
pub async fn admin_test_chat(
    State(state): State<AppState>,
    user: UserAuth,
) -> Result<Json<ChatRoom>, ApiError> {
    let profiles = ProfileRepository::new(state.pool.clone());
    require_reviewer(&profiles, &user).await?;

    let room = ChatRepository::new(state.pool.clone())
        .get_or_create_private_room(user.user_id, ADMIN_TEST_CHAT_NAME)
        .await?;

    info!(room_id = %room.id, admin = %user.user_id, "Admin test chat ready");
    Ok(Json(room.into()))
}
