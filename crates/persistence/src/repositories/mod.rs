//! Repository implementations for database operations.

pub mod chat;
pub mod connection;
pub mod connection_request;
pub mod profile;

pub use chat::ChatRepository;
pub use connection::ConnectionRepository;
pub use connection_request::{AcceptOutcome, AcceptedConnection, ConnectionRequestRepository};
pub use profile::ProfileRepository;
