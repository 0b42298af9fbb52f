//! Route registration — collects module routes + system endpoints.

use std::sync::Arc;

use axum::http::{HeaderValue, Method, header};
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use voting::coordinator::VoteCoordinator;

use crate::auth_middleware::{self, JwtState};
use crate::config::ServerConfig;
use crate::login;

/// Application shared state.
#[derive(Clone)]
pub struct AppState {
    pub jwt_state: Arc<JwtState>,
    pub server_config: Arc<ServerConfig>,
    pub coordinator: Arc<VoteCoordinator>,
}

/// Build the complete router with all routes.
pub fn build_router(state: AppState, module_routes: Vec<(&str, Router)>) -> Router {
    let jwt_state = state.jwt_state.clone();
    let cors = cors_layer(&state.server_config);

    // System endpoints (public, no state needed).
    let system_routes = Router::new()
        .route("/health", get(health))
        .route("/version", get(version));

    // Login routes need AppState.
    let mut app: Router<()> = Router::new()
        .merge(login::routes())
        .with_state(state);

    app = app.merge(system_routes);

    // Module routes are already Router<()> (they called .with_state() internally).
    for (name, router) in module_routes {
        tracing::info!("mounting {name} module routes");
        app = app.merge(router);
    }

    // Auth middleware inside, CORS outside so preflights never need a token.
    app.layer(middleware::from_fn_with_state(
        jwt_state,
        auth_middleware::auth_middleware,
    ))
    .layer(cors)
}

/// CORS for the browser frontend. Origins come from config; an empty list
/// opens the API to any origin for development.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "worldvoted",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
