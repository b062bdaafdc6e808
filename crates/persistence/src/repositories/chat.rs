//! Chat repository: rooms, membership and messages.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{ChatRoomEntity, MessageEntity};
use crate::metrics::QueryTimer;

/// Repository for chat database operations.
#[derive(Clone)]
pub struct ChatRepository {
    pool: PgPool,
}

impl ChatRepository {
    /// Creates a new ChatRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn find_room(&self, room_id: Uuid) -> Result<Option<ChatRoomEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_chat_room");
        let result = sqlx::query_as::<_, ChatRoomEntity>(
            r#"
            SELECT id, name, connection_id, is_public, created_at
            FROM chat_room
            WHERE id = $1
            "#,
        )
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn is_member(&self, room_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("is_chat_room_member");
        let result: Result<(bool,), sqlx::Error> = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM chat_room_member
                WHERE chat_room_id = $1 AND member_id = $2
            )
            "#,
        )
        .bind(room_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        Ok(result?.0)
    }

    /// Rooms a user belongs to, newest first.
    pub async fn list_rooms_for(&self, user_id: Uuid) -> Result<Vec<ChatRoomEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_chat_rooms_for_user");
        let result = sqlx::query_as::<_, ChatRoomEntity>(
            r#"
            SELECT r.id, r.name, r.connection_id, r.is_public, r.created_at
            FROM chat_room r
            JOIN chat_room_member m ON m.chat_room_id = r.id
            WHERE m.member_id = $1
            ORDER BY r.created_at DESC, r.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Messages in a room, newest first, strictly before `before` when given.
    pub async fn list_messages(
        &self,
        room_id: Uuid,
        before: Option<(DateTime<Utc>, Uuid)>,
        limit: i64,
    ) -> Result<Vec<MessageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_chat_messages");
        let (before_at, before_id) = match before {
            Some((at, id)) => (Some(at), Some(id)),
            None => (None, None),
        };
        let result = sqlx::query_as::<_, MessageEntity>(
            r#"
            SELECT m.id, m.chat_room_id, m.author_id, p.name AS author_name,
                   m.text, m.created_at
            FROM message m
            LEFT JOIN user_profile p ON p.id = m.author_id
            WHERE m.chat_room_id = $1
              AND ($2::timestamptz IS NULL OR (m.created_at, m.id) < ($2, $3))
            ORDER BY m.created_at DESC, m.id DESC
            LIMIT $4
            "#,
        )
        .bind(room_id)
        .bind(before_at)
        .bind(before_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn insert_message(
        &self,
        room_id: Uuid,
        author_id: Uuid,
        text: &str,
    ) -> Result<MessageEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_chat_message");
        let result = sqlx::query_as::<_, MessageEntity>(
            r#"
            WITH inserted AS (
                INSERT INTO message (chat_room_id, author_id, text)
                VALUES ($1, $2, $3)
                RETURNING id, chat_room_id, author_id, text, created_at
            )
            SELECT i.id, i.chat_room_id, i.author_id, p.name AS author_name,
                   i.text, i.created_at
            FROM inserted i
            LEFT JOIN user_profile p ON p.id = i.author_id
            "#,
        )
        .bind(room_id)
        .bind(author_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Returns the named private room the user belongs to, creating it with
    /// the user as sole member if none exists.
    pub async fn get_or_create_private_room(
        &self,
        owner_id: Uuid,
        name: &str,
    ) -> Result<ChatRoomEntity, sqlx::Error> {
        let timer = QueryTimer::new("get_or_create_private_room");
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, ChatRoomEntity>(
            r#"
            SELECT r.id, r.name, r.connection_id, r.is_public, r.created_at
            FROM chat_room r
            JOIN chat_room_member m ON m.chat_room_id = r.id
            WHERE m.member_id = $1 AND r.name = $2 AND r.connection_id IS NULL
            ORDER BY r.created_at ASC
            LIMIT 1
            "#,
        )
        .bind(owner_id)
        .bind(name)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(room) = existing {
            tx.commit().await?;
            timer.record();
            return Ok(room);
        }

        let room = sqlx::query_as::<_, ChatRoomEntity>(
            r#"
            INSERT INTO chat_room (name, is_public)
            VALUES ($1, FALSE)
            RETURNING id, name, connection_id, is_public, created_at
            "#,
        )
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO chat_room_member (chat_room_id, member_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(room.id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(room)
    }
}
