//! Bearer token authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::extractors::user_auth::authenticate;

/// Rejects requests without a valid identity token and stores the resolved
/// [`UserAuth`](crate::extractors::UserAuth) in request extensions for the
/// layers and handlers below.
pub async fn require_user_auth(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();
    match authenticate(&parts, &state.jwt) {
        Ok(auth) => {
            tracing::Span::current().record("user_id", tracing::field::display(auth.user_id));
            parts.extensions.insert(auth);
            next.run(Request::from_parts(parts, body)).await
        }
        Err(e) => e.into_response(),
    }
}
