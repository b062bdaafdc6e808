//! Candidate filtering for the matches list.

use std::collections::HashSet;
use uuid::Uuid;

use crate::models::connection_request::ConnectionRequestStatus;
use crate::models::profile::ProfileStatus;

/// How past requests affect who can be matched again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchmakingPolicy {
    /// When true, a declined request keeps the pair apart.
    pub declined_blocks: bool,
}

impl Default for MatchmakingPolicy {
    fn default() -> Self {
        Self {
            declined_blocks: true,
        }
    }
}

impl MatchmakingPolicy {
    pub fn from_allow_rerequest(allow_rerequest_after_decline: bool) -> Self {
        Self {
            declined_blocks: !allow_rerequest_after_decline,
        }
    }

    /// Whether a request in `status` keeps the pair apart.
    pub fn blocks(&self, status: ConnectionRequestStatus) -> bool {
        status.is_active() || self.declined_blocks
    }
}

/// Anything the filter can inspect.
pub trait MatchCandidate {
    fn candidate_id(&self) -> Uuid;
    fn candidate_status(&self) -> ProfileStatus;
}

/// A request edge touching the viewer.
#[derive(Debug, Clone, Copy)]
pub struct RequestEdge {
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub status: ConnectionRequestStatus,
}

/// Collects every id the viewer must not be shown.
pub fn exclusion_set(
    viewer: Uuid,
    requests: &[RequestEdge],
    connected: &[Uuid],
    policy: MatchmakingPolicy,
) -> HashSet<Uuid> {
    let mut excluded: HashSet<Uuid> = connected.iter().copied().collect();
    for edge in requests {
        if !policy.blocks(edge.status) {
            continue;
        }
        if edge.sender_id == viewer {
            excluded.insert(edge.receiver_id);
        } else if edge.receiver_id == viewer {
            excluded.insert(edge.sender_id);
        }
    }
    excluded.insert(viewer);
    excluded
}

/// Keeps approved candidates that are neither the viewer nor excluded,
/// preserving input order.
pub fn filter_candidates<C: MatchCandidate>(
    viewer: Uuid,
    pool: Vec<C>,
    excluded: &HashSet<Uuid>,
) -> Vec<C> {
    pool.into_iter()
        .filter(|c| c.candidate_status() == ProfileStatus::Approved)
        .filter(|c| c.candidate_id() != viewer && !excluded.contains(&c.candidate_id()))
        .collect()
}
