//! Analytics ingestion and admin reporting handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;

use flore_core::{AnalyticsEvent, Dashboard};

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Build the analytics router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/analytics", post(record))
        .route("/api/admin/analytics", get(list))
        .route("/api/admin/analytics/dashboard", get(dashboard))
}

/// Acknowledgement for a recorded event.
#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub status: &'static str,
}

/// Record a client analytics event.
///
/// # Errors
///
/// Returns 400 if the body is not a JSON object.
pub async fn record(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<RecordResponse>)> {
    let id = state.analytics().record(payload).await?;
    tracing::debug!(event_id = %id, "Analytics event recorded");
    Ok((StatusCode::CREATED, Json(RecordResponse { status: "ok" })))
}

/// Every stored analytics event.
pub async fn list(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Json<Vec<AnalyticsEvent>> {
    Json(state.analytics().events().await)
}

/// Dashboard aggregate.
pub async fn dashboard(_admin: RequireAdmin, State(state): State<AppState>) -> Json<Dashboard> {
    Json(state.dashboard().compute().await)
}
