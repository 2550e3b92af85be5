//! Admin login handler.

use axum::{Json, Router, extract::State, routing::post};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::{Result, add_breadcrumb};
use crate::middleware::login_rate_limiter;
use crate::services::AuthError;
use crate::state::AppState;

/// Build the login router. The route carries its own rate limiter, keyed
/// on proxy headers only when `trust_proxy_headers` is set.
pub fn router(trust_proxy_headers: bool) -> Router<AppState> {
    Router::new().route(
        "/api/admin/login",
        post(login).layer(login_rate_limiter(trust_proxy_headers)),
    )
}

/// Login request body.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Login response body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Exchange the admin password for a bearer token.
///
/// # Errors
///
/// Returns `401 {"error":"Invalid credentials"}` on any mismatch.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let stored_hash = state
        .store()
        .read(|doc| doc.admin.password_hash.clone())
        .await;

    match state.auth().verify_credential(SecretString::from(body.password), stored_hash).await {
        Ok(issued) => {
            tracing::info!(expires_at = %issued.expires_at, "Admin login succeeded");
            add_breadcrumb("auth", "Admin login", None);
            Ok(Json(LoginResponse {
                token: issued.token,
            }))
        }
        Err(AuthError::InvalidCredential) => {
            tracing::warn!("Admin login failed: invalid credentials");
            Err(AuthError::InvalidCredential.into())
        }
        Err(e) => Err(e.into()),
    }
}
