//! Custom Axum extractors.

pub mod user_auth;

pub use user_auth::{OptionalUserAuth, UserAuth};
