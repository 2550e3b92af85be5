//! Product handlers: public catalog and admin CRUD.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};

use flore_core::{Product, ProductInput, ProductPatch};

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::services::Visibility;
use crate::state::AppState;

/// Build the product router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_public))
        .route("/api/products/{id}", get(show_public))
        .route("/api/admin/products", get(list_admin).post(create))
        .route("/api/admin/products/{id}", put(update).delete(remove))
}

/// Active products, in store order.
pub async fn list_public(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.catalog().list_products(Visibility::Public).await)
}

/// One active product.
///
/// # Errors
///
/// Returns 404 if the product is missing or inactive.
pub async fn show_public(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let product = state.catalog().get_product(&id, Visibility::Public).await?;
    Ok(Json(product))
}

/// Every product, including inactive ones.
pub async fn list_admin(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Json<Vec<Product>> {
    Json(state.catalog().list_products(Visibility::Admin).await)
}

/// Create a product.
///
/// # Errors
///
/// Returns 400 for invalid input, 409 for a duplicate id, 500 if the store
/// cannot persist.
pub async fn create(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = state.catalog().create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Partially update a product.
///
/// # Errors
///
/// Returns 404 if the product is missing, 400 for invalid input.
pub async fn update(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>> {
    let product = state.catalog().update_product(&id, patch).await?;
    Ok(Json(product))
}

/// Delete a product.
///
/// # Errors
///
/// Returns 404 if the product is missing.
pub async fn remove(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.catalog().delete_product(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
