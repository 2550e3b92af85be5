//! Admin authorization extractor.
//!
//! Every administrative handler takes [`RequireAdmin`] as an argument, so
//! the token is checked before the handler body (and the store) is reached.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AppError;
use crate::services::AuthError;
use crate::services::auth::Claims;
use crate::state::AppState;

/// Extractor that requires a valid admin bearer token.
///
/// Rejects with `401` when no `Authorization: Bearer` header is present and
/// `403` when the token is invalid or expired.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAdmin(claims): RequireAdmin) -> impl IntoResponse {
///     format!("token expires at {}", claims.exp)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub Claims);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthError::Unauthenticated)?;
        let claims = state.auth().authorize(token)?;
        Ok(Self(claims))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
