pub mod votes;
pub mod worlds;

use std::sync::Arc;

use axum::{Json, Router};
use serde::Serialize;

use worldvote_core::ServiceError;

use crate::coordinator::VoteCoordinator;

/// Shared application state.
pub type AppState = Arc<VoteCoordinator>;

/// Build the voting API router. Error bodies come from
/// `ServiceError::into_response` — `{"code": ..., "message": ...}`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(worlds::routes())
        .merge(votes::routes())
}

/// Wrap a service result into a JSON response.
pub(crate) fn ok_json<T: Serialize>(
    result: Result<T, ServiceError>,
) -> Result<Json<T>, ServiceError> {
    result.map(Json)
}
