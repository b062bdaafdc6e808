//! Profile review state machine.
//!
//! ```text
//! incomplete ──submit──▶ pending_review ──approve──▶ approved
//!                              ▲      └────reject───▶ rejected
//!                              └───────submit────────────┘
//! ```

use crate::error::DomainError;
use crate::models::profile::ProfileStatus;

/// A transition requested on a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileTransition {
    Submit,
    Approve,
    Reject,
}

impl ProfileTransition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileTransition::Submit => "submit",
            ProfileTransition::Approve => "approve",
            ProfileTransition::Reject => "reject",
        }
    }

    /// Statuses this transition may start from.
    pub fn allowed_from(&self) -> &'static [ProfileStatus] {
        match self {
            ProfileTransition::Submit => &[ProfileStatus::Incomplete, ProfileStatus::Rejected],
            ProfileTransition::Approve | ProfileTransition::Reject => {
                &[ProfileStatus::PendingReview]
            }
        }
    }

    pub fn target(&self) -> ProfileStatus {
        match self {
            ProfileTransition::Submit => ProfileStatus::PendingReview,
            ProfileTransition::Approve => ProfileStatus::Approved,
            ProfileTransition::Reject => ProfileStatus::Rejected,
        }
    }
}

/// Applies `transition` to `current`, returning the new status.
pub fn apply(
    current: ProfileStatus,
    transition: ProfileTransition,
) -> Result<ProfileStatus, DomainError> {
    if transition.allowed_from().contains(&current) {
        Ok(transition.target())
    } else {
        Err(DomainError::InvalidState(format!(
            "Cannot {} a profile in status {}",
            transition.as_str(),
            current
        )))
    }
}

/// Page a client should move to after being told about `status`.
pub fn redirect_for_status(status: ProfileStatus) -> &'static str {
    match status {
        ProfileStatus::Approved => "/",
        ProfileStatus::Rejected => "/profile/rejected",
        ProfileStatus::PendingReview => "/profile/pending",
        ProfileStatus::Incomplete => "/profile/setup",
    }
}
