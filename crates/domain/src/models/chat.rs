//! Chat room and message domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name given to the admin's private test room.
pub const ADMIN_TEST_CHAT_NAME: &str = "Admin Test Chat";

/// A chat room. Rooms created on acceptance carry their connection id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChatRoom {
    pub id: Uuid,
    pub name: String,
    pub connection_id: Option<Uuid>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

/// Builds the display name of a connection's private room.
pub fn connection_room_name(first: &str, second: &str) -> String {
    let first = if first.trim().is_empty() { "Member" } else { first.trim() };
    let second = if second.trim().is_empty() { "Member" } else { second.trim() };
    format!("{} & {}", first, second)
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Message {
    pub id: Uuid,
    pub chat_room_id: Uuid,
    pub author_id: Uuid,
    pub author_name: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SendMessageRequest {
    pub text: String,
}

/// Query parameters for paging through a room's history.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListMessagesQuery {
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}

/// One page of messages, oldest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MessagesResponse {
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SendMessageResponse {
    pub success: bool,
    pub message: Message,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RoomsResponse {
    pub rooms: Vec<ChatRoom>,
    pub total: usize,
}
