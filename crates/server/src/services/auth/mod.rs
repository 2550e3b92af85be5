//! Authentication service.
//!
//! A single admin identity guarded by an Argon2id password hash stored in
//! the document. A successful login yields an HS256 JWT that expires a fixed
//! eight hours after issue; there is no refresh and no revocation.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::validate_admin_password;

/// Subject of every issued token.
pub const ADMIN_SUBJECT: &str = "admin";

/// Lifetime of an issued token.
pub const TOKEN_TTL_HOURS: i64 = 8;

/// Claims carried by an admin token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Token issued on a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    #[serde(skip)]
    pub expires_at: DateTime<Utc>,
}

/// Authentication service.
///
/// Holds the signing keys derived from `JWT_SECRET`. Cheap to share behind
/// the application state.
pub struct AuthService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl AuthService {
    /// Create a service signing with `secret`.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.sub = Some(ADMIN_SUBJECT.to_string());

        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            validation,
            ttl: Duration::hours(TOKEN_TTL_HOURS),
        }
    }

    /// Verify `password` against the stored hash and issue a token.
    ///
    /// Hash verification runs on the blocking pool.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredential` on any mismatch, including an
    /// unparsable stored hash.
    pub async fn verify_credential(
        &self,
        password: SecretString,
        stored_hash: String,
    ) -> Result<IssuedToken, AuthError> {
        tokio::task::spawn_blocking(move || {
            verify_password(password.expose_secret(), &stored_hash)
        })
        .await??;

        self.issue_token(Utc::now())
    }

    /// Issue a token as if at `now`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Token` if signing fails.
    pub fn issue_token(&self, now: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: ADMIN_SUBJECT.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Validate a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidOrExpiredToken` if the signature, expiry,
    /// or subject check fails.
    pub fn authorize(&self, token: &str) -> Result<Claims, AuthError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected admin token");
                AuthError::InvalidOrExpiredToken
            })
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` if the password is too short, or
/// `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    validate_admin_password(password).map_err(AuthError::WeakPassword)?;

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredential` on mismatch or if `hash` is not a
/// valid PHC string.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredential)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredential)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new(&SecretString::from("k7Q!v2#Lp9@xR4$mZ8&nB1^tW6*hC3%yF5"))
    }

    #[test]
    fn test_hash_is_salted() {
        let a = hash_password("rosas-vermelhas").unwrap();
        let b = hash_password("rosas-vermelhas").unwrap();
        assert!(a.starts_with("$argon2id$"));
        assert_ne!(a, b);
        assert!(verify_password("rosas-vermelhas", &a).is_ok());
        assert!(verify_password("rosas-vermelhas", &b).is_ok());
    }

    #[test]
    fn test_hash_rejects_short_password() {
        assert!(matches!(
            hash_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_verify_rejects_near_misses() {
        let hash = hash_password("girassol-amarelo").unwrap();
        for attempt in ["girassol-amarel", "Girassol-amarelo", "girassol-amarelo ", ""] {
            assert!(
                matches!(verify_password(attempt, &hash), Err(AuthError::InvalidCredential)),
                "{attempt:?}"
            );
        }
    }

    #[test]
    fn test_verify_rejects_unparsable_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredential)
        ));
    }

    #[tokio::test]
    async fn test_verify_credential_issues_admin_token() {
        let auth = service();
        let hash = hash_password("girassol-amarelo").unwrap();

        let issued = auth
            .verify_credential(SecretString::from("girassol-amarelo"), hash)
            .await
            .unwrap();
        let claims = auth.authorize(&issued.token).unwrap();

        assert_eq!(claims.sub, ADMIN_SUBJECT);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_HOURS * 3600);
    }

    #[tokio::test]
    async fn test_verify_credential_wrong_password() {
        let auth = service();
        let hash = hash_password("girassol-amarelo").unwrap();
        let result = auth
            .verify_credential(SecretString::from("orquidea-branca"), hash)
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredential)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = service();
        let issued = auth
            .issue_token(Utc::now() - Duration::hours(TOKEN_TTL_HOURS) - Duration::seconds(5))
            .unwrap();
        assert!(matches!(
            auth.authorize(&issued.token),
            Err(AuthError::InvalidOrExpiredToken)
        ));
    }

    #[test]
    fn test_token_near_expiry_still_valid() {
        let auth = service();
        let issued = auth
            .issue_token(Utc::now() - Duration::hours(TOKEN_TTL_HOURS) + Duration::minutes(5))
            .unwrap();
        assert!(auth.authorize(&issued.token).is_ok());
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let other = AuthService::new(&SecretString::from("Zp8#Wq3!Lr6@Tn1$Vb4%Xc7^Md2&Hs9*Ky5"));
        let issued = other.issue_token(Utc::now()).unwrap();
        assert!(matches!(
            service().authorize(&issued.token),
            Err(AuthError::InvalidOrExpiredToken)
        ));
    }

    #[test]
    fn test_non_admin_subject_rejected() {
        let secret = "k7Q!v2#Lp9@xR4$mZ8&nB1^tW6*hC3%yF5";
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "customer".to_string(),
            iat: now,
            exp: now + 3600,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();
        assert!(matches!(
            service().authorize(&token),
            Err(AuthError::InvalidOrExpiredToken)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(matches!(
            service().authorize("not.a.jwt"),
            Err(AuthError::InvalidOrExpiredToken)
        ));
    }
}
