use axum::{
    Router,
    extract::State,
    routing::{get, post},
    Json,
};

use worldvote_core::{CurrentStudent, ServiceError};

use crate::model::{Participant, VoteRef, VoteRequest};
use super::{AppState, ok_json};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/votes", post(toggle_vote))
        .route("/votes/my-votes", get(my_votes))
}

/// One endpoint for like and unlike: the coordinator decides from current
/// state. Responds with the refreshed participant in both branches.
async fn toggle_vote(
    State(c): State<AppState>,
    CurrentStudent(student_id): CurrentStudent,
    Json(body): Json<VoteRequest>,
) -> Result<Json<Participant>, ServiceError> {
    ok_json(c.toggle_vote(student_id, body.participant_id))
}

async fn my_votes(
    State(c): State<AppState>,
    CurrentStudent(student_id): CurrentStudent,
) -> Result<Json<Vec<VoteRef>>, ServiceError> {
    ok_json(
        c.votes()
            .participant_ids_for_student(student_id)
            .map(|ids| {
                ids.into_iter()
                    .map(|participant_id| VoteRef { participant_id })
                    .collect()
            }),
    )
}
