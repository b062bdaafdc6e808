//! Domain error taxonomy.

use thiserror::Error;

/// Errors produced by domain rules.
///
/// Every mutating operation reports one of these instead of panicking; the
/// API layer turns them into user-safe responses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Not authorized: {0}")]
    Authorization(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    Store(String),
}
