//! `digicon serve` -- HTTP JSON gateway in front of the chaincode.
//!
//! Endpoints:
//! - GET  /health           - Server status
//! - POST /initLedger       - Write the genesis contract
//! - POST /addContract      - Store `{"key", "value"}` under a fresh key
//! - GET  /contracts/{key}  - Read the record stored under `key`
//! - POST /invoke           - Generic `{"operation", "args"}` dispatch
//!
//! Successful calls answer `{"success", "payload"}`; failures answer
//! `{"error", "kind"}` with a status derived from the error kind.

mod handlers;
mod state;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use digicon_chaincode::Chaincode;
use tower_http::cors::{Any, CorsLayer};

use self::handlers::{
    handle_add_contract, handle_get_contract, handle_health, handle_init_ledger, handle_invoke,
    handle_not_found,
};
use self::state::AppState;
use crate::config::Config;
use crate::ledger::open_ledger;

/// Maximum request body size: 1 MB.
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Construct a JSON error response with the given status code and message.
fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (status, Json(serde_json::json!({"error": message})))
}

fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/initLedger", post(handle_init_ledger))
        .route("/addContract", post(handle_add_contract))
        .route("/contracts/{key}", get(handle_get_contract))
        .route("/invoke", post(handle_invoke))
        .fallback(handle_not_found)
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state)
}

/// Open the configured ledger and serve until Ctrl+C.
pub async fn start_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let ledger = open_ledger(&config.ledger)?;
    let state = Arc::new(AppState::new(Chaincode::new(), ledger));
    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        addr = %addr,
        backend = ?config.ledger.backend,
        ledger = %config.ledger.path.display(),
        "digicon gateway listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("received shutdown signal");
}
