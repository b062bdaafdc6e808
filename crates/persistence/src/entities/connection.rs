//! Connection entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::connection::{Connection, ConnectionItem};
use domain::models::profile::ProfileSummary;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the connections table.
#[derive(Debug, Clone, FromRow)]
pub struct ConnectionEntity {
    pub id: Uuid,
    pub user1_id: Uuid,
    pub user2_id: Uuid,
    pub connection_request_id: Uuid,
    pub chat_room_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<ConnectionEntity> for Connection {
    fn from(entity: ConnectionEntity) -> Self {
        Self {
            id: entity.id,
            user1_id: entity.user1_id,
            user2_id: entity.user2_id,
            connection_request_id: entity.connection_request_id,
            chat_room_id: entity.chat_room_id,
            created_at: entity.created_at,
        }
    }
}

/// A connection joined with the other member's profile.
#[derive(Debug, Clone, FromRow)]
pub struct ConnectionWithOtherEntity {
    pub id: Uuid,
    pub chat_room_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub other_id: Uuid,
    pub other_name: String,
    pub other_bio: Option<String>,
    pub other_location: Option<String>,
    pub other_photo_url: Option<String>,
}

impl From<ConnectionWithOtherEntity> for ConnectionItem {
    fn from(entity: ConnectionWithOtherEntity) -> Self {
        Self {
            id: entity.id,
            chat_room_id: entity.chat_room_id,
            created_at: entity.created_at,
            other_user: ProfileSummary {
                id: entity.other_id,
                name: entity.other_name,
                bio: entity.other_bio,
                location: entity.other_location,
                photo_url: entity.other_photo_url,
            },
        }
    }
}
