//! Connection domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::profile::ProfileSummary;

/// A symmetric link between two profiles, created on acceptance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Connection {
    pub id: Uuid,
    pub user1_id: Uuid,
    pub user2_id: Uuid,
    pub connection_request_id: Uuid,
    pub chat_room_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Connection {
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.user1_id == user_id || self.user2_id == user_id
    }

    /// Returns the id of the other member, or `None` if `user_id` is not part
    /// of this connection.
    pub fn other_user(&self, user_id: Uuid) -> Option<Uuid> {
        if self.user1_id == user_id {
            Some(self.user2_id)
        } else if self.user2_id == user_id {
            Some(self.user1_id)
        } else {
            None
        }
    }
}

/// Connection as seen by one of its members.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ConnectionItem {
    pub id: Uuid,
    pub chat_room_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub other_user: ProfileSummary,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ConnectionsResponse {
    pub connections: Vec<ConnectionItem>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_user_is_symmetric() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let connection = Connection {
            id: Uuid::new_v4(),
            user1_id: a,
            user2_id: b,
            connection_request_id: Uuid::new_v4(),
            chat_room_id: None,
            created_at: Utc::now(),
        };

        assert_eq!(connection.other_user(a), Some(b));
        assert_eq!(connection.other_user(b), Some(a));
        assert_eq!(connection.other_user(Uuid::new_v4()), None);
        assert!(connection.involves(a));
        assert!(!connection.involves(Uuid::new_v4()));
    }
}
