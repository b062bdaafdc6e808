//! Connection request repository for database operations.
//!
//! Accepting a request is the one multi-statement write in the service: the
//! request row is locked, checked and flipped to accepted, and the connection,
//! its private chat room and both memberships are created in the same
//! transaction.

use domain::models::chat::connection_room_name;
use domain::models::connection_request::{ConnectionRequest, ConnectionRequestStatus};
use domain::services::policy;
use domain::DomainError;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::entities::{
    ChatRoomEntity, ConnectionEntity, ConnectionRequestEntity, RequestWithPartyEntity,
};
use crate::metrics::QueryTimer;

/// Everything created by a successful accept.
#[derive(Debug, Clone)]
pub struct AcceptedConnection {
    pub request: ConnectionRequestEntity,
    pub connection: ConnectionEntity,
    pub chat_room: ChatRoomEntity,
}

/// Result of an accept attempt that reached the database.
#[derive(Debug, Clone)]
pub enum AcceptOutcome {
    Accepted(AcceptedConnection),
    /// The transaction was rolled back; nothing changed.
    Refused(DomainError),
}

/// Repository for connection request database operations.
#[derive(Clone)]
pub struct ConnectionRequestRepository {
    pool: PgPool,
}

impl ConnectionRequestRepository {
    /// Creates a new ConnectionRequestRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert a pending request. A concurrent duplicate fails on the active
    /// pair index with a unique violation.
    pub async fn create(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<ConnectionRequestEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_connection_request");
        let result = sqlx::query_as::<_, ConnectionRequestEntity>(
            r#"
            INSERT INTO connection_requests (sender_id, receiver_id)
            VALUES ($1, $2)
            RETURNING id, sender_id, receiver_id, status, created_at, responded_at
            "#,
        )
        .bind(sender_id)
        .bind(receiver_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<ConnectionRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_connection_request_by_id");
        let result = sqlx::query_as::<_, ConnectionRequestEntity>(
            r#"
            SELECT id, sender_id, receiver_id, status, created_at, responded_at
            FROM connection_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All requests between two users, in either direction and any status.
    pub async fn find_between(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<Vec<ConnectionRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_connection_requests_between");
        let result = sqlx::query_as::<_, ConnectionRequestEntity>(
            r#"
            SELECT id, sender_id, receiver_id, status, created_at, responded_at
            FROM connection_requests
            WHERE (sender_id = $1 AND receiver_id = $2)
               OR (sender_id = $2 AND receiver_id = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// All requests touching a user, in any status.
    pub async fn list_involving(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ConnectionRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_connection_requests_involving");
        let result = sqlx::query_as::<_, ConnectionRequestEntity>(
            r#"
            SELECT id, sender_id, receiver_id, status, created_at, responded_at
            FROM connection_requests
            WHERE sender_id = $1 OR receiver_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Pending requests addressed to a user, newest first, with the sender.
    pub async fn list_incoming(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<RequestWithPartyEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_incoming_connection_requests");
        let result = sqlx::query_as::<_, RequestWithPartyEntity>(
            r#"
            SELECT cr.id, cr.status, cr.created_at,
                   p.id AS party_id, p.name AS party_name, p.bio AS party_bio,
                   p.location AS party_location, p.photo_url AS party_photo_url
            FROM connection_requests cr
            JOIN user_profile p ON p.id = cr.sender_id
            WHERE cr.receiver_id = $1 AND cr.status = 'pending'
            ORDER BY cr.created_at DESC, cr.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Pending requests sent by a user, newest first, with the receiver.
    pub async fn list_outgoing(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<RequestWithPartyEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_outgoing_connection_requests");
        let result = sqlx::query_as::<_, RequestWithPartyEntity>(
            r#"
            SELECT cr.id, cr.status, cr.created_at,
                   p.id AS party_id, p.name AS party_name, p.bio AS party_bio,
                   p.location AS party_location, p.photo_url AS party_photo_url
            FROM connection_requests cr
            JOIN user_profile p ON p.id = cr.receiver_id
            WHERE cr.sender_id = $1 AND cr.status = 'pending'
            ORDER BY cr.created_at DESC, cr.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Accept a request on behalf of `caller`.
    ///
    /// Authorization and state checks run against the locked row, so two
    /// concurrent accepts serialize and the second sees `accepted`.
    pub async fn accept(
        &self,
        request_id: Uuid,
        caller: Uuid,
    ) -> Result<AcceptOutcome, sqlx::Error> {
        let timer = QueryTimer::new("accept_connection_request");
        let mut tx = self.pool.begin().await?;

        let locked = sqlx::query_as::<_, ConnectionRequestEntity>(
            r#"
            SELECT id, sender_id, receiver_id, status, created_at, responded_at
            FROM connection_requests
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(request_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(locked) = locked else {
            timer.record();
            return Ok(AcceptOutcome::Refused(DomainError::NotFound(
                "Connection request not found".to_string(),
            )));
        };

        let request = ConnectionRequest::from(locked);
        if let Err(e) = policy::authorize_response(&request, caller) {
            timer.record();
            return Ok(AcceptOutcome::Refused(e));
        }
        if request.status != ConnectionRequestStatus::Pending {
            debug!(request_id = %request_id, status = %request.status, "Accept on settled request");
            timer.record();
            return Ok(AcceptOutcome::Refused(DomainError::InvalidState(format!(
                "Connection request is already {}",
                request.status
            ))));
        }

        let accepted = sqlx::query_as::<_, ConnectionRequestEntity>(
            r#"
            UPDATE connection_requests
            SET status = 'accepted', responded_at = NOW()
            WHERE id = $1
            RETURNING id, sender_id, receiver_id, status, created_at, responded_at
            "#,
        )
        .bind(request_id)
        .fetch_one(&mut *tx)
        .await?;

        let connection = sqlx::query_as::<_, ConnectionEntity>(
            r#"
            INSERT INTO connections (user1_id, user2_id, connection_request_id)
            VALUES ($1, $2, $3)
            RETURNING id, user1_id, user2_id, connection_request_id, chat_room_id, created_at
            "#,
        )
        .bind(accepted.sender_id)
        .bind(accepted.receiver_id)
        .bind(accepted.id)
        .fetch_one(&mut *tx)
        .await?;

        let names: Vec<(Uuid, String)> = sqlx::query_as(
            r#"
            SELECT id, name FROM user_profile WHERE id = $1 OR id = $2
            "#,
        )
        .bind(accepted.sender_id)
        .bind(accepted.receiver_id)
        .fetch_all(&mut *tx)
        .await?;
        let name_of = |id: Uuid| {
            names
                .iter()
                .find(|(pid, _)| *pid == id)
                .map(|(_, name)| name.as_str())
                .unwrap_or("")
        };
        let room_name =
            connection_room_name(name_of(accepted.sender_id), name_of(accepted.receiver_id));

        let chat_room = sqlx::query_as::<_, ChatRoomEntity>(
            r#"
            INSERT INTO chat_room (name, connection_id, is_public)
            VALUES ($1, $2, FALSE)
            RETURNING id, name, connection_id, is_public, created_at
            "#,
        )
        .bind(&room_name)
        .bind(connection.id)
        .fetch_one(&mut *tx)
        .await?;

        let connection = sqlx::query_as::<_, ConnectionEntity>(
            r#"
            UPDATE connections
            SET chat_room_id = $2
            WHERE id = $1
            RETURNING id, user1_id, user2_id, connection_request_id, chat_room_id, created_at
            "#,
        )
        .bind(connection.id)
        .bind(chat_room.id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO chat_room_member (chat_room_id, member_id)
            VALUES ($1, $2), ($1, $3)
            "#,
        )
        .bind(chat_room.id)
        .bind(accepted.sender_id)
        .bind(accepted.receiver_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(AcceptOutcome::Accepted(AcceptedConnection {
            request: accepted,
            connection,
            chat_room,
        }))
    }

    /// Decline a pending request addressed to `receiver_id`.
    ///
    /// Returns `None` when no pending request with that receiver exists.
    pub async fn decline(
        &self,
        request_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<Option<ConnectionRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("decline_connection_request");
        let result = sqlx::query_as::<_, ConnectionRequestEntity>(
            r#"
            UPDATE connection_requests
            SET status = 'declined', responded_at = NOW()
            WHERE id = $1 AND receiver_id = $2 AND status = 'pending'
            RETURNING id, sender_id, receiver_id, status, created_at, responded_at
            "#,
        )
        .bind(request_id)
        .bind(receiver_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a pending request sent by `sender_id`. Returns whether a row
    /// was removed.
    pub async fn cancel(&self, request_id: Uuid, sender_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("cancel_connection_request");
        let result = sqlx::query(
            r#"
            DELETE FROM connection_requests
            WHERE id = $1 AND sender_id = $2 AND status = 'pending'
            "#,
        )
        .bind(request_id)
        .bind(sender_id)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}
