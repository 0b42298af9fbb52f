pub mod import;
pub mod maintenance;

use std::path::Path;
use std::sync::Arc;

use voting::coordinator::VoteCoordinator;
use worldvote_sql::{SQLStore, SqliteStore};

/// Open the database and return a ready coordinator. Initializes the
/// schema so the CLI also works against a fresh file.
pub fn open(db_path: &Path) -> anyhow::Result<VoteCoordinator> {
    let db: Arc<dyn SQLStore> = Arc::new(
        SqliteStore::open(db_path)
            .map_err(|e| anyhow::anyhow!("failed to open {}: {}", db_path.display(), e))?,
    );
    voting::schema::init_schema(db.as_ref())?;
    Ok(VoteCoordinator::new(db))
}
