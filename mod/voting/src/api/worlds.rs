use axum::{
    Router,
    extract::{Path, Query, State},
    routing::get,
    Json,
};

use worldvote_core::{ListParams, ListResult, ServiceError};

use crate::model::Participant;
use super::{AppState, ok_json};

/// Leaderboard depth exposed by the fixed scoreboard endpoint.
const LEADERBOARD_SIZE: usize = 5;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/worlds", get(list_worlds))
        .route("/worlds/top5", get(top_worlds))
        .route("/worlds/{id}", get(get_world))
}

async fn list_worlds(
    State(c): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResult<Participant>>, ServiceError> {
    ok_json(c.participants().list(&params))
}

async fn top_worlds(
    State(c): State<AppState>,
) -> Result<Json<Vec<Participant>>, ServiceError> {
    ok_json(c.participants().top_n(LEADERBOARD_SIZE))
}

async fn get_world(
    State(c): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Participant>, ServiceError> {
    ok_json(c.participants().get(id))
}
