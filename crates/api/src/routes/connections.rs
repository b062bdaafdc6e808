use axum::{extract::State, Json};
use domain::models::connection::{ConnectionItem, ConnectionsResponse};
use persistence::repositories::ConnectionRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// The caller's connections, newest first, each with the other member.
///
/// GET /api/v1/connections
pub async fn list_connections(
    State(state): State<AppState>,
    user: UserAuth,
) -> Result<Json<ConnectionsResponse>, ApiError> {
    let connections: Vec<ConnectionItem> = ConnectionRepository::new(state.pool.clone())
        .list_for_user(user.user_id)
        .await?
        .into_iter()
        .map(ConnectionItem::from)
        .collect();
    let total = connections.len();
    Ok(Json(ConnectionsResponse { connections, total }))
}
