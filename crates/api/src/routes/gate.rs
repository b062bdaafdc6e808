use axum::{
    extract::{Query, State},
    Json,
};
use domain::services::access_gate::{evaluate, GateDecision};
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::OptionalUserAuth;
use crate::middleware::access_gate::load_subject;

#[derive(Debug, Deserialize)]
pub struct GateQuery {
    pub path: String,
}

/// Tells the front-end router whether the caller may open `path`, and
/// where to go instead when not.
///
/// GET /api/v1/gate?path=/matches
pub async fn check_gate(
    State(state): State<AppState>,
    OptionalUserAuth(user): OptionalUserAuth,
    Query(query): Query<GateQuery>,
) -> Result<Json<GateDecision>, ApiError> {
    if !query.path.starts_with('/') {
        return Err(ApiError::validation("path must be absolute"));
    }

    let subject = match user {
        Some(user) => Some(load_subject(&state.pool, user.user_id).await?),
        None => None,
    };

    Ok(Json(evaluate(subject, &query.path)))
}
