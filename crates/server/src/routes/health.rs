//! Root and health check handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Build the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
}

/// Response for the root endpoint.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: String,
}

/// API banner with the current server time.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        status: "ok",
        message: "Florê API is running",
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 200 once the document can be read. A stalled commit holds the
/// writer lock, not the read lock, so this stays responsive during writes.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    let readable = state
        .store()
        .read(|doc| !doc.admin.password_hash.is_empty())
        .await;
    if readable {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
