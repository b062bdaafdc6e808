//! HTTP route handlers.

pub mod admin;
pub mod connection_requests;
pub mod connections;
pub mod gate;
pub mod health;
pub mod matches;
pub mod profiles;
pub mod rooms;
