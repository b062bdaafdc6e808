//! Connection request entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::connection_request::{
    ConnectionRequest, ConnectionRequestStatus, IncomingRequest, OutgoingRequest,
};
use domain::models::profile::ProfileSummary;
use domain::services::matchmaking::RequestEdge;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for connection_request_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "connection_request_status", rename_all = "lowercase")]
pub enum ConnectionRequestStatusDb {
    Pending,
    Accepted,
    Declined,
}

impl From<ConnectionRequestStatusDb> for ConnectionRequestStatus {
    fn from(status: ConnectionRequestStatusDb) -> Self {
        match status {
            ConnectionRequestStatusDb::Pending => ConnectionRequestStatus::Pending,
            ConnectionRequestStatusDb::Accepted => ConnectionRequestStatus::Accepted,
            ConnectionRequestStatusDb::Declined => ConnectionRequestStatus::Declined,
        }
    }
}

/// Database row mapping for the connection_requests table.
#[derive(Debug, Clone, FromRow)]
pub struct ConnectionRequestEntity {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub status: ConnectionRequestStatusDb,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl From<ConnectionRequestEntity> for ConnectionRequest {
    fn from(entity: ConnectionRequestEntity) -> Self {
        Self {
            id: entity.id,
            sender_id: entity.sender_id,
            receiver_id: entity.receiver_id,
            status: entity.status.into(),
            created_at: entity.created_at,
            responded_at: entity.responded_at,
        }
    }
}

impl From<&ConnectionRequestEntity> for RequestEdge {
    fn from(entity: &ConnectionRequestEntity) -> Self {
        Self {
            sender_id: entity.sender_id,
            receiver_id: entity.receiver_id,
            status: entity.status.into(),
        }
    }
}

/// A request joined with the profile on the other side.
#[derive(Debug, Clone, FromRow)]
pub struct RequestWithPartyEntity {
    pub id: Uuid,
    pub status: ConnectionRequestStatusDb,
    pub created_at: DateTime<Utc>,
    pub party_id: Uuid,
    pub party_name: String,
    pub party_bio: Option<String>,
    pub party_location: Option<String>,
    pub party_photo_url: Option<String>,
}

impl RequestWithPartyEntity {
    fn party(&self) -> ProfileSummary {
        ProfileSummary {
            id: self.party_id,
            name: self.party_name.clone(),
            bio: self.party_bio.clone(),
            location: self.party_location.clone(),
            photo_url: self.party_photo_url.clone(),
        }
    }
}

impl From<RequestWithPartyEntity> for IncomingRequest {
    fn from(entity: RequestWithPartyEntity) -> Self {
        Self {
            id: entity.id,
            status: entity.status.into(),
            created_at: entity.created_at,
            sender: entity.party(),
        }
    }
}

impl From<RequestWithPartyEntity> for OutgoingRequest {
    fn from(entity: RequestWithPartyEntity) -> Self {
        Self {
            id: entity.id,
            status: entity.status.into(),
            created_at: entity.created_at,
            receiver: entity.party(),
        }
    }
}
