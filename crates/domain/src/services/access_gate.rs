//! Page access policy.
//!
//! Given who is asking (if anyone), their role and review status, decides
//! whether a path may be served or where the client should go instead. The
//! function is total and holds no state so it can run on every request.

use serde::Serialize;

use crate::models::profile::{ProfileStatus, UserRole};

pub const LOGIN_PATH: &str = "/auth/login";
pub const HOME_PATH: &str = "/";
pub const ADMIN_PATH: &str = "/admin";
pub const PROFILE_SETUP_PATH: &str = "/profile/setup";
pub const PROFILE_PENDING_PATH: &str = "/profile/pending";
pub const PROFILE_REJECTED_PATH: &str = "/profile/rejected";

/// The caller as seen by the gate. `status` is `None` when no profile row
/// exists yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateSubject {
    pub role: UserRole,
    pub status: Option<ProfileStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "location", rename_all = "snake_case")]
pub enum GateDecision {
    Allow,
    Redirect(String),
}

impl GateDecision {
    fn redirect(path: &str) -> Self {
        GateDecision::Redirect(path.to_string())
    }
}

/// Matches `prefix` exactly or as a leading path segment.
fn under(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'),
        None => false,
    }
}

fn is_auth_route(path: &str) -> bool {
    under(path, "/auth")
}

fn is_home(path: &str) -> bool {
    path == HOME_PATH || path.starts_with("/?")
}

pub fn evaluate(subject: Option<GateSubject>, path: &str) -> GateDecision {
    if is_auth_route(path) {
        return GateDecision::Allow;
    }

    let subject = match subject {
        Some(subject) => subject,
        None => return GateDecision::redirect(LOGIN_PATH),
    };

    if subject.role.is_admin() {
        if is_home(path) {
            return GateDecision::redirect(ADMIN_PATH);
        }
        return GateDecision::Allow;
    }

    if under(path, ADMIN_PATH) {
        return GateDecision::redirect(HOME_PATH);
    }

    match subject.status.unwrap_or(ProfileStatus::Incomplete) {
        ProfileStatus::Incomplete => {
            if under(path, PROFILE_SETUP_PATH) {
                GateDecision::Allow
            } else {
                GateDecision::redirect(PROFILE_SETUP_PATH)
            }
        }
        ProfileStatus::PendingReview => {
            if under(path, PROFILE_PENDING_PATH) {
                GateDecision::Allow
            } else {
                GateDecision::redirect(PROFILE_PENDING_PATH)
            }
        }
        ProfileStatus::Rejected => {
            if under(path, PROFILE_REJECTED_PATH) || under(path, PROFILE_SETUP_PATH) {
                GateDecision::Allow
            } else {
                GateDecision::redirect(PROFILE_REJECTED_PATH)
            }
        }
        ProfileStatus::Approved => GateDecision::Allow,
    }
}
