//! Matchmaking route.

use axum::{extract::State, Json};
use domain::models::matchmaking::{PotentialMatch, PotentialMatchesResponse};
use domain::services::matchmaking::{
    exclusion_set, filter_candidates, MatchmakingPolicy, RequestEdge,
};
use persistence::repositories::{
    ConnectionRepository, ConnectionRequestRepository, ProfileRepository,
};
use tracing::debug;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Approved profiles the caller has no history with.
///
/// GET /api/v1/matches
///
/// Recomputed on every call, in profile creation order.
pub async fn list_potential_matches(
    State(state): State<AppState>,
    user: UserAuth,
) -> Result<Json<PotentialMatchesResponse>, ApiError> {
    let profiles = ProfileRepository::new(state.pool.clone());
    let requests = ConnectionRequestRepository::new(state.pool.clone());
    let connections = ConnectionRepository::new(state.pool.clone());

    let (approved, edges, connected) = tokio::try_join!(
        profiles.list_approved(),
        requests.list_involving(user.user_id),
        connections.list_connected_ids(user.user_id),
    )?;

    let edges: Vec<RequestEdge> = edges.iter().map(RequestEdge::from).collect();
    let policy =
        MatchmakingPolicy::from_allow_rerequest(state.config.limits.allow_rerequest_after_decline);
    let excluded = exclusion_set(user.user_id, &edges, &connected, policy);

    let matches: Vec<PotentialMatch> = filter_candidates(user.user_id, approved, &excluded)
        .into_iter()
        .map(PotentialMatch::from)
        .collect();
    let total = matches.len();

    debug!(
        user_id = %user.user_id,
        excluded = excluded.len(),
        total,
        "Computed potential matches"
    );

    Ok(Json(PotentialMatchesResponse { matches, total }))
}
