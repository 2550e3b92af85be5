//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No bearer token was supplied.
    #[error("authentication required")]
    Unauthenticated,

    /// The token is malformed, badly signed, expired, or not an admin token.
    #[error("invalid or expired token")]
    InvalidOrExpiredToken,

    /// The supplied password does not match the stored hash.
    #[error("invalid credentials")]
    InvalidCredential,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Token signing failed.
    #[error("token signing error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// The blocking hash task was cancelled or panicked.
    #[error("password task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
