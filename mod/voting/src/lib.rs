pub mod api;
pub mod coordinator;
pub mod model;
pub mod schema;
pub mod store;

use std::sync::Arc;

use axum::Router;
use worldvote_core::Module;
use worldvote_sql::SQLStore;

use coordinator::VoteCoordinator;

/// The voting module — participants, students, votes, and the leaderboard.
pub struct VotingModule {
    coordinator: Arc<VoteCoordinator>,
}

impl VotingModule {
    /// Create the voting module and initialize its schema.
    pub fn new(db: Arc<dyn SQLStore>) -> Result<Self, worldvote_core::ServiceError> {
        schema::init_schema(db.as_ref())?;
        Ok(Self {
            coordinator: Arc::new(VoteCoordinator::new(db)),
        })
    }

    /// The coordinator, for callers outside the HTTP surface (the login
    /// endpoint's student lookup, import tooling).
    pub fn coordinator(&self) -> &Arc<VoteCoordinator> {
        &self.coordinator
    }
}

impl Module for VotingModule {
    fn name(&self) -> &str {
        "voting"
    }

    fn routes(&self) -> Router {
        api::router(Arc::clone(&self.coordinator))
    }
}
