//! Connection request domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::profile::ProfileSummary;

/// Status of a connection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionRequestStatus {
    Pending,
    Accepted,
    Declined,
}

impl ConnectionRequestStatus {
    /// Pending and accepted requests occupy the pair.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ConnectionRequestStatus::Pending | ConnectionRequestStatus::Accepted
        )
    }
}

impl std::fmt::Display for ConnectionRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionRequestStatus::Pending => write!(f, "pending"),
            ConnectionRequestStatus::Accepted => write!(f, "accepted"),
            ConnectionRequestStatus::Declined => write!(f, "declined"),
        }
    }
}

/// A directional request from one profile to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ConnectionRequest {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub status: ConnectionRequestStatus,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl ConnectionRequest {
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.sender_id == user_id || self.receiver_id == user_id
    }

    /// Returns the id on the other side of the request.
    pub fn counterpart(&self, user_id: Uuid) -> Option<Uuid> {
        if self.sender_id == user_id {
            Some(self.receiver_id)
        } else if self.receiver_id == user_id {
            Some(self.sender_id)
        } else {
            None
        }
    }
}

/// Request body for sending a connection request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SendConnectionRequestRequest {
    pub receiver_id: Uuid,
}

/// Response after sending a connection request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SendConnectionRequestResponse {
    pub success: bool,
    pub request: ConnectionRequest,
}

/// Pending request addressed to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct IncomingRequest {
    pub id: Uuid,
    pub status: ConnectionRequestStatus,
    pub created_at: DateTime<Utc>,
    pub sender: ProfileSummary,
}

/// Pending request sent by the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OutgoingRequest {
    pub id: Uuid,
    pub status: ConnectionRequestStatus,
    pub created_at: DateTime<Utc>,
    pub receiver: ProfileSummary,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct IncomingRequestsResponse {
    pub requests: Vec<IncomingRequest>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OutgoingRequestsResponse {
    pub requests: Vec<OutgoingRequest>,
    pub total: usize,
}

/// Response after accepting a request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AcceptRequestResponse {
    pub success: bool,
    pub request_id: Uuid,
    pub connection_id: Uuid,
    pub chat_room_id: Uuid,
}

/// Response after declining or cancelling a request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RequestActionResponse {
    pub success: bool,
    pub request_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ConnectionRequestStatus>,
}
