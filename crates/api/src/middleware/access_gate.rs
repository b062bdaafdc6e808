//! Server-side page gate.
//!
//! Each API area is guarded by the page it backs. The caller's role and
//! profile status are re-read on every request, and a redirect decision ends
//! the request with `303 See Other` before the handler runs.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::models::profile::UserRole;
use domain::services::access_gate::{evaluate, GateDecision, GateSubject};
use persistence::repositories::ProfileRepository;
use sqlx::PgPool;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// State for one gated area: the app state plus the page path it serves.
#[derive(Clone)]
pub struct GateArea {
    pub app: AppState,
    pub page: &'static str,
}

impl GateArea {
    pub fn new(app: AppState, page: &'static str) -> Self {
        Self { app, page }
    }
}

/// Loads what the gate needs to know about a user. A missing profile row
/// yields a plain user with no status.
pub async fn load_subject(pool: &PgPool, user_id: Uuid) -> Result<GateSubject, sqlx::Error> {
    let profile = ProfileRepository::new(pool.clone())
        .find_by_id(user_id)
        .await?;
    Ok(match profile {
        Some(p) => GateSubject {
            role: p.role.into(),
            status: Some(p.profile_status.into()),
        },
        None => GateSubject {
            role: UserRole::User,
            status: None,
        },
    })
}

pub fn see_other(location: &str) -> Response {
    let mut response = StatusCode::SEE_OTHER.into_response();
    if let Ok(value) = HeaderValue::from_str(location) {
        response.headers_mut().insert(header::LOCATION, value);
    }
    response
}

pub async fn require_page_access(
    State(area): State<GateArea>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let subject = match req.extensions().get::<UserAuth>() {
        Some(auth) => match load_subject(&area.app.pool, auth.user_id).await {
            Ok(subject) => Some(subject),
            Err(e) => return ApiError::from(e).into_response(),
        },
        None => None,
    };

    match evaluate(subject, area.page) {
        GateDecision::Allow => next.run(req).await,
        GateDecision::Redirect(location) => {
            tracing::debug!(page = area.page, location = %location, "Gate redirect");
            see_other(&location)
        }
    }
}
