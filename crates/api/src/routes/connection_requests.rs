//! Connection request routes: send, list, accept, decline, cancel.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::connection_request::{
    AcceptRequestResponse, ConnectionRequest, ConnectionRequestStatus, IncomingRequest,
    IncomingRequestsResponse, OutgoingRequest, OutgoingRequestsResponse, RequestActionResponse,
    SendConnectionRequestRequest, SendConnectionRequestResponse,
};
use domain::models::profile::ProfileStatus;
use domain::services::matchmaking::MatchmakingPolicy;
use domain::services::policy;
use persistence::repositories::{
    AcceptOutcome, ConnectionRepository, ConnectionRequestRepository, ProfileRepository,
};
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::{record_connection_created, record_connection_request_sent};

/// POST /api/v1/connection-requests
pub async fn send_request(
    State(state): State<AppState>,
    user: UserAuth,
    Json(body): Json<SendConnectionRequestRequest>,
) -> Result<(StatusCode, Json<SendConnectionRequestResponse>), ApiError> {
    let sender_id = user.user_id;
    let receiver_id = body.receiver_id;
    policy::ensure_not_self(sender_id, receiver_id)?;

    let profiles = ProfileRepository::new(state.pool.clone());

    // Admins pass the page gate without approval; sending still needs it.
    let sender_status = profiles
        .find_by_id(sender_id)
        .await?
        .map(|p| ProfileStatus::from(p.profile_status));
    policy::authorize_send(sender_status)?;

    let receiver = profiles
        .find_by_id(receiver_id)
        .await?
        .filter(|p| ProfileStatus::from(p.profile_status) == ProfileStatus::Approved)
        .ok_or_else(|| ApiError::NotFound("Receiver not found".to_string()))?;

    let connected = ConnectionRepository::new(state.pool.clone())
        .exists_between(sender_id, receiver.id)
        .await?;
    policy::ensure_not_connected(connected)?;

    let requests = ConnectionRequestRepository::new(state.pool.clone());
    let rerequest =
        MatchmakingPolicy::from_allow_rerequest(state.config.limits.allow_rerequest_after_decline);
    let blocked = requests
        .find_between(sender_id, receiver.id)
        .await?
        .into_iter()
        .any(|r| rerequest.blocks(r.status.into()));
    policy::ensure_no_open_request(blocked)?;

    // A concurrent duplicate loses on the active-pair unique index.
    let created = requests.create(sender_id, receiver.id).await.map_err(|e| {
        match ApiError::from(e) {
            ApiError::Conflict(_) => ApiError::Conflict(
                "A connection request already exists between you".to_string(),
            ),
            other => other,
        }
    })?;

    info!(
        request_id = %created.id,
        sender_id = %sender_id,
        receiver_id = %receiver.id,
        "Connection request sent"
    );
    record_connection_request_sent();

    Ok((
        StatusCode::CREATED,
        Json(SendConnectionRequestResponse {
            success: true,
            request: created.into(),
        }),
    ))
}

/// Pending requests addressed to the caller, newest first.
///
/// GET /api/v1/connection-requests
pub async fn list_incoming(
    State(state): State<AppState>,
    user: UserAuth,
) -> Result<Json<IncomingRequestsResponse>, ApiError> {
    let requests: Vec<IncomingRequest> = ConnectionRequestRepository::new(state.pool.clone())
        .list_incoming(user.user_id)
        .await?
        .into_iter()
        .map(IncomingRequest::from)
        .collect();
    let total = requests.len();
    Ok(Json(IncomingRequestsResponse { requests, total }))
}

/// Pending requests the caller sent, newest first.
///
/// GET /api/v1/connection-requests/sent
pub async fn list_outgoing(
    State(state): State<AppState>,
    user: UserAuth,
) -> Result<Json<OutgoingRequestsResponse>, ApiError> {
    let requests: Vec<OutgoingRequest> = ConnectionRequestRepository::new(state.pool.clone())
        .list_outgoing(user.user_id)
        .await?
        .into_iter()
        .map(OutgoingRequest::from)
        .collect();
    let total = requests.len();
    Ok(Json(OutgoingRequestsResponse { requests, total }))
}

/// Accepting creates the connection and its private chat room atomically.
///
/// POST /api/v1/connection-requests/:request_id/accept
pub async fn accept_request(
    State(state): State<AppState>,
    user: UserAuth,
    Path(request_id): Path<Uuid>,
) -> Result<Json<AcceptRequestResponse>, ApiError> {
    let outcome = ConnectionRequestRepository::new(state.pool.clone())
        .accept(request_id, user.user_id)
        .await?;

    let accepted = match outcome {
        AcceptOutcome::Accepted(accepted) => accepted,
        AcceptOutcome::Refused(reason) => return Err(reason.into()),
    };

    info!(
        request_id = %request_id,
        connection_id = %accepted.connection.id,
        chat_room_id = %accepted.chat_room.id,
        "Connection request accepted"
    );
    record_connection_created();

    Ok(Json(AcceptRequestResponse {
        success: true,
        request_id,
        connection_id: accepted.connection.id,
        chat_room_id: accepted.chat_room.id,
    }))
}

/// Works out why a guarded decline or cancel matched no row.
async fn refusal(
    repo: &ConnectionRequestRepository,
    request_id: Uuid,
    caller: Uuid,
    authorize: fn(&ConnectionRequest, Uuid) -> Result<(), domain::DomainError>,
) -> ApiError {
    let request = match repo.find_by_id(request_id).await {
        Ok(Some(entity)) => ConnectionRequest::from(entity),
        Ok(None) => return ApiError::NotFound("Connection request not found".to_string()),
        Err(e) => return e.into(),
    };
    if let Err(e) = authorize(&request, caller) {
        return e.into();
    }
    ApiError::InvalidState(format!("Connection request is already {}", request.status))
}

/// POST /api/v1/connection-requests/:request_id/decline
pub async fn decline_request(
    State(state): State<AppState>,
    user: UserAuth,
    Path(request_id): Path<Uuid>,
) -> Result<Json<RequestActionResponse>, ApiError> {
    let repo = ConnectionRequestRepository::new(state.pool.clone());
    let Some(declined) = repo.decline(request_id, user.user_id).await? else {
        return Err(refusal(&repo, request_id, user.user_id, policy::authorize_response).await);
    };

    info!(request_id = %request_id, receiver_id = %user.user_id, "Connection request declined");
    Ok(Json(RequestActionResponse {
        success: true,
        request_id,
        status: Some(ConnectionRequestStatus::from(declined.status)),
    }))
}

/// DELETE /api/v1/connection-requests/:request_id
pub async fn cancel_request(
    State(state): State<AppState>,
    user: UserAuth,
    Path(request_id): Path<Uuid>,
) -> Result<Json<RequestActionResponse>, ApiError> {
    let repo = ConnectionRequestRepository::new(state.pool.clone());
    if !repo.cancel(request_id, user.user_id).await? {
        return Err(refusal(&repo, request_id, user.user_id, policy::authorize_cancel).await);
    }

    info!(request_id = %request_id, sender_id = %user.user_id, "Connection request cancelled");
    Ok(Json(RequestActionResponse {
        success: true,
        request_id,
        status: None,
    }))
}
