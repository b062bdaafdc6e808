//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod chat;
pub mod connection;
pub mod connection_request;
pub mod profile;

pub use chat::{ChatRoomEntity, MessageEntity};
pub use connection::{ConnectionEntity, ConnectionWithOtherEntity};
pub use connection_request::{
    ConnectionRequestEntity, ConnectionRequestStatusDb, RequestWithPartyEntity,
};
pub use profile::{GenderDb, ProfileEntity, ProfileStatusDb, UserRoleDb};
