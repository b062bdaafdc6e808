//! Ownership and role checks run before every mutation.

use uuid::Uuid;

use crate::error::DomainError;
use crate::models::connection_request::ConnectionRequest;
use crate::models::profile::{ProfileStatus, UserRole};

/// Only admins may approve or reject profiles.
pub fn authorize_review(role: UserRole) -> Result<(), DomainError> {
    if role.is_admin() {
        Ok(())
    } else {
        Err(DomainError::Authorization(
            "Only admins can review profiles".to_string(),
        ))
    }
}

/// Only the receiver may accept or decline a request.
pub fn authorize_response(request: &ConnectionRequest, caller: Uuid) -> Result<(), DomainError> {
    if request.receiver_id == caller {
        Ok(())
    } else {
        Err(DomainError::Authorization(
            "Only the receiver can respond to this request".to_string(),
        ))
    }
}

/// Only the sender may cancel a request.
pub fn authorize_cancel(request: &ConnectionRequest, caller: Uuid) -> Result<(), DomainError> {
    if request.sender_id == caller {
        Ok(())
    } else {
        Err(DomainError::Authorization(
            "Only the sender can cancel this request".to_string(),
        ))
    }
}

pub fn authorize_room_access(is_member: bool) -> Result<(), DomainError> {
    if is_member {
        Ok(())
    } else {
        Err(DomainError::Authorization(
            "You are not a member of this room".to_string(),
        ))
    }
}

/// Only approved profiles may reach out, whatever the caller's role.
pub fn authorize_send(sender_status: Option<ProfileStatus>) -> Result<(), DomainError> {
    match sender_status {
        Some(ProfileStatus::Approved) => Ok(()),
        _ => Err(DomainError::Authorization(
            "Your profile must be approved before sending requests".to_string(),
        )),
    }
}

pub fn ensure_not_connected(already_connected: bool) -> Result<(), DomainError> {
    if already_connected {
        Err(DomainError::Conflict("You are already connected".to_string()))
    } else {
        Ok(())
    }
}

/// `blocked` is true when an existing request between the pair still
/// counts under the re-request policy.
pub fn ensure_no_open_request(blocked: bool) -> Result<(), DomainError> {
    if blocked {
        Err(DomainError::Conflict(
            "A connection request already exists between you".to_string(),
        ))
    } else {
        Ok(())
    }
}

pub fn ensure_not_self(sender: Uuid, receiver: Uuid) -> Result<(), DomainError> {
    if sender == receiver {
        Err(DomainError::Validation(
            "Cannot send a connection request to yourself".to_string(),
        ))
    } else {
        Ok(())
    }
}
