//! Realtime profile status fan-out.
//!
//! One broadcast channel per watched profile id. Delivery is at-most-once:
//! events published while nobody listens are dropped, and a subscriber that
//! falls behind skips what it missed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::models::profile::ProfileStatus;
use crate::services::profile_status::redirect_for_status;

/// Default per-profile channel capacity.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;

/// Payload pushed to clients watching a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProfileStatusEvent {
    pub profile_id: Uuid,
    pub profile_status: ProfileStatus,
    pub rejection_reason: Option<String>,
    pub redirect_to: String,
}

impl ProfileStatusEvent {
    pub fn new(
        profile_id: Uuid,
        profile_status: ProfileStatus,
        rejection_reason: Option<String>,
    ) -> Self {
        Self {
            profile_id,
            profile_status,
            rejection_reason,
            redirect_to: redirect_for_status(profile_status).to_string(),
        }
    }

    /// Whether this event changes what a client last saw.
    ///
    /// Watchers subscribe before reading the current row, so the first
    /// queued events may already be reflected in that snapshot.
    pub fn differs_from(&self, seen: &ProfileStatusEvent) -> bool {
        self.profile_status != seen.profile_status
            || self.rejection_reason != seen.rejection_reason
    }
}

type Channels = HashMap<Uuid, broadcast::Sender<ProfileStatusEvent>>;

#[derive(Debug, Clone)]
pub struct ProfileStatusHub {
    channels: Arc<Mutex<Channels>>,
    capacity: usize,
}

impl Default for ProfileStatusHub {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl ProfileStatusHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Arc::new(Mutex::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Channels> {
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publishes an event, returning how many subscribers received it.
    pub fn publish(&self, event: ProfileStatusEvent) -> usize {
        let channels = self.lock();
        let Some(sender) = channels.get(&event.profile_id) else {
            debug!(profile_id = %event.profile_id, "No status watchers, event dropped");
            return 0;
        };
        sender.send(event).unwrap_or(0)
    }

    /// Starts watching a profile.
    pub fn subscribe(&self, profile_id: Uuid) -> StatusSubscription {
        let mut channels = self.lock();
        let receiver = channels
            .entry(profile_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe();
        StatusSubscription {
            profile_id,
            receiver,
            hub: self.clone(),
        }
    }

    /// Number of profiles with at least one watcher.
    pub fn watched_profiles(&self) -> usize {
        self.lock().len()
    }

    pub fn subscriber_count(&self, profile_id: Uuid) -> usize {
        self.lock()
            .get(&profile_id)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }
}

/// A live watch on one profile. Dropping it releases the channel once no
/// other subscriber remains.
#[derive(Debug)]
pub struct StatusSubscription {
    profile_id: Uuid,
    receiver: broadcast::Receiver<ProfileStatusEvent>,
    hub: ProfileStatusHub,
}

impl StatusSubscription {
    pub fn profile_id(&self) -> Uuid {
        self.profile_id
    }

    /// Waits for the next event. Returns `None` once the channel is gone.
    pub async fn recv(&mut self) -> Option<ProfileStatusEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(profile_id = %self.profile_id, skipped, "Status watcher lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for StatusSubscription {
    fn drop(&mut self) {
        let mut channels = self.hub.lock();
        // Our own receiver is still alive here, so one means "only us".
        let last = channels
            .get(&self.profile_id)
            .map(|s| s.receiver_count() <= 1)
            .unwrap_or(false);
        if last {
            channels.remove(&self.profile_id);
        }
    }
}
