//! Category handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};

use flore_core::{Category, CategoryInput, CategoryPatch};

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Build the category router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(list))
        .route("/api/admin/categories", get(list_admin).post(create))
        .route("/api/admin/categories/{id}", put(update).delete(remove))
}

/// All categories.
pub async fn list(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.catalog().list_categories().await)
}

/// All categories, behind the admin gate.
pub async fn list_admin(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Json<Vec<Category>> {
    Json(state.catalog().list_categories().await)
}

/// Create a category. The id is derived from the name when omitted.
///
/// # Errors
///
/// Returns 400 for invalid input, 409 for a duplicate id.
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<Category>)> {
    let category = state.catalog().create_category(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Partially update a category.
///
/// # Errors
///
/// Returns 404 if the category is missing, 400 for invalid input.
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<CategoryPatch>,
) -> Result<Json<Category>> {
    let category = state.catalog().update_category(&id, patch).await?;
    Ok(Json(category))
}

/// Delete a category. Products keep their category reference.
///
/// # Errors
///
/// Returns 404 if the category is missing.
pub async fn remove(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.catalog().delete_category(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
