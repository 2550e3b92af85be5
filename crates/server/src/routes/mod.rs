//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                               - API banner
//! GET    /health                         - Liveness check
//! GET    /health/ready                   - Readiness check
//!
//! # Public
//! GET    /api/products                   - Active products
//! GET    /api/products/{id}              - One active product
//! GET    /api/categories                 - All categories
//! GET    /api/settings                   - Site settings
//! POST   /api/analytics                  - Record an event
//!
//! # Auth
//! POST   /api/admin/login                - Password login (rate limited)
//!
//! # Admin (Bearer token)
//! GET    /api/admin/products             - All products
//! POST   /api/admin/products             - Create product
//! PUT    /api/admin/products/{id}        - Update product
//! DELETE /api/admin/products/{id}        - Delete product
//! GET    /api/admin/categories           - All categories
//! POST   /api/admin/categories           - Create category
//! PUT    /api/admin/categories/{id}      - Update category
//! DELETE /api/admin/categories/{id}      - Delete category
//! POST   /api/admin/settings             - Merge settings
//! GET    /api/admin/orders               - All orders
//! GET    /api/admin/analytics            - All events
//! GET    /api/admin/analytics/dashboard  - Dashboard aggregate
//! ```
//!
//! Anything else falls through to the static directory when one is
//! configured, or a JSON 404.

pub mod analytics;
pub mod auth;
pub mod categories;
pub mod health;
pub mod orders;
pub mod products;
pub mod settings;

use axum::{
    Router,
    extract::Request,
    middleware::from_fn,
    response::{IntoResponse, Response},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Create all API routes.
pub fn routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router(config.trust_proxy_headers))
        .merge(products::router())
        .merge(categories::router())
        .merge(settings::router())
        .merge(orders::router())
        .merge(analytics::router())
}

/// Build the complete application: routes, fallback and middleware stack.
pub fn app(state: AppState) -> Router {
    let static_dir = state.config().static_dir.clone();

    let router = routes(state.config());
    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router.fallback(not_found),
    };

    router
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
        .layer(sentry_tower::NewSentryLayer::new_from_top())
}

async fn not_found(request: Request) -> Response {
    AppError::NotFound(format!("route {}", request.uri().path())).into_response()
}
