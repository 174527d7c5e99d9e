/// Axum HTTP server setup and routing

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::*;
use crate::state::LedgerState;

pub fn create_router(state: Arc<LedgerState>) -> Router {
    // Configure CORS to allow requests from wallet frontend/tests
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Wallet RPC surface
        .route("/rpc", post(rpc_endpoint))

        // Dev helper endpoints
        .route("/dev/seed", post(seed_items))

        // Shared state
        .with_state(state)

        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Serves the router on an already-bound listener
///
/// Integration tests bind port 0 themselves and hand the listener over
/// to get a free port.
pub async fn serve(
    listener: tokio::net::TcpListener,
    state: Arc<LedgerState>,
) -> anyhow::Result<()> {
    let app = create_router(state);
    axum::serve(listener, app).await?;
    Ok(())
}

pub async fn run_server(
    state: Arc<LedgerState>,
    host: String,
    port: u16,
) -> anyhow::Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!("🚀 Chain mock node listening on http://{}", addr);
    log::info!("📡 Wallet RPC endpoint: POST /rpc");
    log::info!("🌱 Seed endpoint: POST /dev/seed");

    serve(listener, state).await
}
