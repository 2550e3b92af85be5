//! Order handlers. Orders are read-only over the API.

use axum::{Json, Router, extract::State, routing::get};

use flore_core::Order;

use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Build the order router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/admin/orders", get(list))
}

/// All orders, in store order.
pub async fn list(_admin: RequireAdmin, State(state): State<AppState>) -> Json<Vec<Order>> {
    Json(state.catalog().orders().await)
}
