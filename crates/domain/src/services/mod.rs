//! Domain services for the Maknoon backend.
//!
//! Services hold the business rules that operate on domain models. They are
//! pure or in-memory; persistence lives in the `persistence` crate.

pub mod access_gate;
pub mod matchmaking;
pub mod photo;
pub mod policy;
pub mod profile_status;
pub mod status_events;

pub use access_gate::{evaluate, GateDecision, GateSubject};
pub use matchmaking::{exclusion_set, filter_candidates, MatchCandidate, MatchmakingPolicy, RequestEdge};
pub use profile_status::{redirect_for_status, ProfileTransition};
pub use status_events::{ProfileStatusEvent, ProfileStatusHub, StatusSubscription};
