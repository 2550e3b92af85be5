//! Site settings handlers.

use axum::{Json, Router, extract::State, routing::{get, post}};
use serde_json::Value;

use flore_core::Settings;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Build the settings router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/settings", get(show))
        .route("/api/admin/settings", post(update))
}

/// The settings object, verbatim.
pub async fn show(State(state): State<AppState>) -> Json<Settings> {
    Json(state.catalog().settings().await)
}

/// Shallow-merge a partial settings object and return the full result.
///
/// # Errors
///
/// Returns 400 if the body is not a JSON object.
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(patch): Json<Value>,
) -> Result<Json<Settings>> {
    let settings = state.catalog().update_settings(patch).await?;
    tracing::info!(keys = settings.len(), "Settings updated");
    Ok(Json(settings))
}
