//! Domain layer for the Maknoon backend.
//!
//! This crate contains:
//! - Domain models (Profile, ConnectionRequest, Connection, ChatRoom, Message)
//! - Business rules: the profile status machine, the access gate, the
//!   authorization policy and the matchmaking filter
//! - The realtime profile status hub
//! - Domain error types

pub mod error;
pub mod models;
pub mod services;

pub use error::DomainError;
