//! Domain models for the Maknoon backend.

pub mod chat;
pub mod connection;
pub mod connection_request;
pub mod matchmaking;
pub mod profile;

pub use chat::{ChatRoom, Message};
pub use connection::Connection;
pub use connection_request::{ConnectionRequest, ConnectionRequestStatus};
pub use matchmaking::PotentialMatch;
pub use profile::{Gender, Profile, ProfileStatus, ProfileSummary, UserRole};
