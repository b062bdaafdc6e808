//! Connection repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{ConnectionEntity, ConnectionWithOtherEntity};
use crate::metrics::QueryTimer;

/// Repository for connection database operations.
#[derive(Clone)]
pub struct ConnectionRepository {
    pool: PgPool,
}

impl ConnectionRepository {
    /// Creates a new ConnectionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn find_by_request_id(
        &self,
        request_id: Uuid,
    ) -> Result<Option<ConnectionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_connection_by_request_id");
        let result = sqlx::query_as::<_, ConnectionEntity>(
            r#"
            SELECT id, user1_id, user2_id, connection_request_id, chat_room_id, created_at
            FROM connections
            WHERE connection_request_id = $1
            "#,
        )
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Whether two users are already connected, in either order.
    pub async fn exists_between(&self, user_a: Uuid, user_b: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("connection_exists_between");
        let result: Result<(bool,), sqlx::Error> = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM connections
                WHERE (user1_id = $1 AND user2_id = $2)
                   OR (user1_id = $2 AND user2_id = $1)
            )
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        Ok(result?.0)
    }

    /// Ids of everyone connected to a user.
    pub async fn list_connected_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("list_connected_ids");
        let result: Result<Vec<(Uuid,)>, sqlx::Error> = sqlx::query_as(
            r#"
            SELECT CASE WHEN user1_id = $1 THEN user2_id ELSE user1_id END
            FROM connections
            WHERE user1_id = $1 OR user2_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(result?.into_iter().map(|(id,)| id).collect())
    }

    /// Connections on either side of a user, newest first, joined with the
    /// other member's profile.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ConnectionWithOtherEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_connections_for_user");
        let result = sqlx::query_as::<_, ConnectionWithOtherEntity>(
            r#"
            SELECT c.id, c.chat_room_id, c.created_at,
                   p.id AS other_id, p.name AS other_name, p.bio AS other_bio,
                   p.location AS other_location, p.photo_url AS other_photo_url
            FROM connections c
            JOIN user_profile p
              ON p.id = CASE WHEN c.user1_id = $1 THEN c.user2_id ELSE c.user1_id END
            WHERE c.user1_id = $1 OR c.user2_id = $1
            ORDER BY c.created_at DESC, c.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
