//! `worldvoted` — the tournament voting server binary.
//!
//! Usage:
//!   worldvoted -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/worldvote/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod auth_middleware;
mod bootstrap;
mod config;
mod login;
mod routes;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use jsonwebtoken::{DecodingKey, Validation};
use tracing::info;
use worldvote_core::Module;

use auth_middleware::JwtState;
use config::ServerConfig;
use routes::AppState;

/// Tournament voting server.
#[derive(Parser, Debug)]
#[command(name = "worldvoted", about = "Worlds tournament voting server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address (overrides default 0.0.0.0:8080).
    #[arg(long = "listen", default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;

    // Verify configuration is valid.
    bootstrap::verify_config(&server_config)?;

    // Initialize storage.
    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let sql: Arc<dyn worldvote_sql::SQLStore> = Arc::new(
        worldvote_sql::SqliteStore::open_with_timeout(
            &server_config.sqlite_path(),
            Duration::from_millis(server_config.storage.busy_timeout_ms),
        )
        .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );

    let voting_module = voting::VotingModule::new(Arc::clone(&sql))
        .map_err(|e| anyhow::anyhow!("failed to initialize voting module: {}", e))?;
    info!("Voting module initialized");

    let module_routes = vec![(voting_module.name(), voting_module.routes())];

    // Build JWT state for middleware.
    let jwt_state = Arc::new(JwtState {
        decoding_key: DecodingKey::from_secret(server_config.jwt.secret.as_bytes()),
        validation: Validation::default(),
    });

    // Build application state.
    let app_state = AppState {
        jwt_state,
        server_config: Arc::new(server_config),
        coordinator: Arc::clone(voting_module.coordinator()),
    };

    // Build router.
    let app = routes::build_router(app_state, module_routes);

    // Start server.
    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    info!("worldvoted listening on {}", cli.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
