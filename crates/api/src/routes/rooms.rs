//! Chat room routes.
//!
//! Message history is paged newest-first with an opaque `(created_at, id)`
//! cursor and each page is returned oldest-first for display.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::chat::{
    ChatRoom, ListMessagesQuery, Message, MessagesResponse, RoomsResponse, SendMessageRequest,
    SendMessageResponse,
};
use domain::services::policy;
use persistence::entities::MessageEntity;
use persistence::repositories::ChatRepository;
use shared::pagination::{clamp_page_size, decode_cursor, encode_cursor};
use shared::validation::validate_message_text;
use tracing::info;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

async fn ensure_member(repo: &ChatRepository, room_id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
    if repo.find_room(room_id).await?.is_none() {
        return Err(ApiError::NotFound("Chat room not found".to_string()));
    }
    policy::authorize_room_access(repo.is_member(room_id, user_id).await?)?;
    Ok(())
}

/// GET /api/v1/rooms
pub async fn list_rooms(
    State(state): State<AppState>,
    user: UserAuth,
) -> Result<Json<RoomsResponse>, ApiError> {
    let rooms: Vec<ChatRoom> = ChatRepository::new(state.pool.clone())
        .list_rooms_for(user.user_id)
        .await?
        .into_iter()
        .map(ChatRoom::from)
        .collect();
    let total = rooms.len();
    Ok(Json(RoomsResponse { rooms, total }))
}

/// GET /api/v1/rooms/:room_id/messages?cursor=&limit=
pub async fn list_messages(
    State(state): State<AppState>,
    user: UserAuth,
    Path(room_id): Path<Uuid>,
    Query(query): Query<ListMessagesQuery>,
) -> Result<Json<MessagesResponse>, ApiError> {
    let before = query.cursor.as_deref().map(decode_cursor).transpose()?;
    let limit = clamp_page_size(query.limit, state.config.limits.message_page_size);

    let repo = ChatRepository::new(state.pool.clone());
    ensure_member(&repo, room_id, user.user_id).await?;

    // One extra row tells us whether an older page exists.
    let rows = repo.list_messages(room_id, before, limit + 1).await?;
    let (messages, next_cursor) = into_page(rows, limit);

    Ok(Json(MessagesResponse {
        messages,
        next_cursor,
    }))
}

/// Turns a newest-first fetch of up to `limit + 1` rows into an
/// oldest-first page and the cursor for the next older page.
fn into_page(mut rows: Vec<MessageEntity>, limit: i64) -> (Vec<Message>, Option<String>) {
    let limit = usize::try_from(limit).unwrap_or(0);
    let has_more = rows.len() > limit;
    rows.truncate(limit);

    let next_cursor = if has_more {
        rows.last().map(|m| encode_cursor(m.created_at, m.id))
    } else {
        None
    };

    let messages = rows.into_iter().rev().map(Message::from).collect();
    (messages, next_cursor)
}

/// POST /api/v1/rooms/:room_id/messages
pub async fn post_message(
    State(state): State<AppState>,
    user: UserAuth,
    Path(room_id): Path<Uuid>,
    Json(body): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<SendMessageResponse>), ApiError> {
    let text = body.text.trim();
    validate_message_text(text).map_err(|e| {
        let mut errors = ValidationErrors::new();
        errors.add("text", e);
        ApiError::from(errors)
    })?;

    let repo = ChatRepository::new(state.pool.clone());
    ensure_member(&repo, room_id, user.user_id).await?;

    let message = repo.insert_message(room_id, user.user_id, text).await?;
    info!(room_id = %room_id, message_id = %message.id, "Message posted");

    Ok((
        StatusCode::CREATED,
        Json(SendMessageResponse {
            success: true,
            message: message.into(),
        }),
    ))
}
