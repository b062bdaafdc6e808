//! Chat room and message entities (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::chat::{ChatRoom, Message};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the chat_room table.
#[derive(Debug, Clone, FromRow)]
pub struct ChatRoomEntity {
    pub id: Uuid,
    pub name: String,
    pub connection_id: Option<Uuid>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ChatRoomEntity> for ChatRoom {
    fn from(entity: ChatRoomEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            connection_id: entity.connection_id,
            is_public: entity.is_public,
            created_at: entity.created_at,
        }
    }
}

/// A message row joined with its author's display name.
#[derive(Debug, Clone, FromRow)]
pub struct MessageEntity {
    pub id: Uuid,
    pub chat_room_id: Uuid,
    pub author_id: Uuid,
    pub author_name: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<MessageEntity> for Message {
    fn from(entity: MessageEntity) -> Self {
        Self {
            id: entity.id,
            chat_room_id: entity.chat_room_id,
            author_id: entity.author_id,
            author_name: entity.author_name,
            text: entity.text,
            created_at: entity.created_at,
        }
    }
}
