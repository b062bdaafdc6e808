//! Caller-owned profile routes: read, submit for review, edit, photo upload
//! target and the realtime status feed.

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use domain::models::profile::{
    Profile, ProfileActionResponse, SubmitProfileRequest, UpdateProfileRequest,
};
use domain::services::photo::{upload_target, PhotoUploadTarget};
use domain::services::profile_status::{self, ProfileTransition};
use domain::services::{ProfileStatusEvent, StatusSubscription};
use futures_util::{SinkExt, StreamExt};
use persistence::repositories::ProfileRepository;
use serde::Deserialize;
use tracing::{debug, info};
use validator::ValidationErrors;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_status_events_delivered;

/// Current caller's profile, created as `incomplete` on first access.
///
/// GET /api/v1/profile
pub async fn get_profile(
    State(state): State<AppState>,
    user: UserAuth,
) -> Result<Json<Profile>, ApiError> {
    let repo = ProfileRepository::new(state.pool.clone());
    let profile = repo.ensure_exists(user.user_id, user.name.as_deref()).await?;
    Ok(Json(profile.into()))
}

/// Submit the profile form for admin review.
///
/// POST /api/v1/profile/submit
pub async fn submit_profile(
    State(state): State<AppState>,
    user: UserAuth,
    Json(request): Json<SubmitProfileRequest>,
) -> Result<Json<ProfileActionResponse>, ApiError> {
    let repo = ProfileRepository::new(state.pool.clone());
    let current = repo.ensure_exists(user.user_id, user.name.as_deref()).await?;

    let submission = request.validate_submission(state.config.limits.max_bio_length)?;

    let Some(updated) = repo.submit(user.user_id, &submission).await? else {
        // The guarded update matched nothing: the status was not submittable
        // when it ran.
        let status = repo
            .find_by_id(user.user_id)
            .await?
            .map(|p| p.profile_status.into())
            .unwrap_or_else(|| current.profile_status.into());
        profile_status::apply(status, ProfileTransition::Submit)?;
        return Err(ApiError::InvalidState(
            "Profile changed while submitting, retry".to_string(),
        ));
    };

    let profile: Profile = updated.into();
    info!(profile_id = %profile.id, "Profile submitted for review");
    let delivered = state.status_hub.publish(ProfileStatusEvent::new(
        profile.id,
        profile.profile_status,
        None,
    ));
    record_status_events_delivered(delivered);

    Ok(Json(ProfileActionResponse {
        success: true,
        profile_id: profile.id,
        profile_status: profile.profile_status,
    }))
}

/// Partial edit of the caller's own profile.
///
/// PATCH /api/v1/profile
pub async fn update_profile(
    State(state): State<AppState>,
    user: UserAuth,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    if request.is_empty() {
        return Err(ApiError::validation("No fields to update"));
    }
    request.validate_update(state.config.limits.max_bio_length)?;

    let repo = ProfileRepository::new(state.pool.clone());
    repo.ensure_exists(user.user_id, user.name.as_deref()).await?;
    let updated = repo
        .update_fields(user.user_id, &request)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    debug!(profile_id = %user.user_id, "Profile fields updated");
    Ok(Json(updated.into()))
}

#[derive(Debug, Deserialize)]
pub struct PhotoTargetQuery {
    pub extension: String,
}

/// Where the client should upload a new profile photo.
///
/// GET /api/v1/profile/photo-target?extension=jpg
pub async fn photo_target(
    State(state): State<AppState>,
    user: UserAuth,
    Query(query): Query<PhotoTargetQuery>,
) -> Result<Json<PhotoUploadTarget>, ApiError> {
    let storage = &state.config.storage;
    let target = upload_target(
        user.user_id,
        Utc::now(),
        &query.extension,
        &storage.public_base_url,
        &storage.bucket,
    )
    .map_err(|e| {
        let mut errors = ValidationErrors::new();
        errors.add("extension", e);
        ApiError::from(errors)
    })?;
    Ok(Json(target))
}

/// Realtime feed of the caller's review status.
///
/// GET /api/v1/profile/status/ws
///
/// The first frame is the current status; later frames are pushed as admins
/// act on the profile.
pub async fn status_ws(
    State(state): State<AppState>,
    user: UserAuth,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, ApiError> {
    // Subscribe before reading the row so a review landing in between is
    // queued rather than lost.
    let subscription = state.status_hub.subscribe(user.user_id);

    let repo = ProfileRepository::new(state.pool.clone());
    let profile: Profile = repo
        .ensure_exists(user.user_id, user.name.as_deref())
        .await?
        .into();
    let snapshot = ProfileStatusEvent::new(
        profile.id,
        profile.profile_status,
        profile.rejection_reason,
    );

    Ok(ws.on_upgrade(move |socket| stream_status(socket, snapshot, subscription)))
}

async fn stream_status(
    socket: WebSocket,
    snapshot: ProfileStatusEvent,
    mut subscription: StatusSubscription,
) {
    let profile_id = subscription.profile_id();
    let (mut sender, mut receiver) = socket.split();

    if send_event(&mut sender, &snapshot).await.is_err() {
        return;
    }
    debug!(profile_id = %profile_id, "Status watcher connected");

    let mut last_sent = snapshot;
    loop {
        tokio::select! {
            event = subscription.recv() => {
                let Some(event) = event else { break };
                if !event.differs_from(&last_sent) {
                    continue;
                }
                if send_event(&mut sender, &event).await.is_err() {
                    break;
                }
                last_sent = event;
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(WsMessage::Close(_))) | Some(Err(_)) | None => break,
                    // Clients have nothing to say on this channel.
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    debug!(profile_id = %profile_id, "Status watcher disconnected");
}

async fn send_event<S>(sender: &mut S, event: &ProfileStatusEvent) -> Result<(), ()>
where
    S: futures_util::Sink<WsMessage> + Unpin,
{
    let payload = serde_json::to_string(event).map_err(|_| ())?;
    sender.send(WsMessage::Text(payload)).await.map_err(|_| ())
}
