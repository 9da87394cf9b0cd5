//! daybreak-server
//!
//! HTTP surface for the check-in pipeline: one authenticated multipart
//! endpoint plus a health probe. Modules are re-exported so integration
//! tests can exercise the router in-process without binding a socket.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

/// Extra multipart framing allowance on top of the video size cap.
const MULTIPART_OVERHEAD: u64 = 2 * 1024 * 1024;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.max_upload_bytes + MULTIPART_OVERHEAD;

    Router::new()
        .route(
            "/api/check-ins",
            post(routes::check_ins::create_check_in).route_layer(
                axum::middleware::from_fn_with_state(state.clone(), auth::require_session),
            ),
        )
        .route("/health", get(routes::health::health_check))
        .layer(DefaultBodyLimit::max(body_limit as usize))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn run(config: config::ServerConfig) -> eyre::Result<()> {
    let state = state::AppState::from_config(&config)?;
    let app = app(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "daybreak server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
