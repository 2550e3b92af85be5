//! Admin credential commands.
//!
//! # Usage
//!
//! ```bash
//! # Print an Argon2id hash for a password read from stdin
//! echo -n 'new-password' | flore hash-password
//!
//! # Replace the stored admin password
//! echo -n 'new-password' | flore admin set-password --data data/db.json
//! ```
//!
//! Rotating the password does not revoke tokens already issued; they stay
//! valid until they expire. Rotate `JWT_SECRET` to cut them off immediately.

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use flore_core::AdminCredential;
use flore_server::services::auth::hash_password;
use flore_server::store::StoreError;

use super::CliError;
use super::store::open_existing;

/// Hash a password with Argon2id.
///
/// # Errors
///
/// Returns `CliError::Auth` if the password is too short or hashing fails.
pub fn hash(password: &SecretString) -> Result<String, CliError> {
    Ok(hash_password(password.expose_secret())?)
}

/// Replace the admin credential in the store at `path`.
///
/// The change goes through the store's mutation path, so a running server
/// would see the same serialized history. The server keeps its own
/// in-memory copy, however, and must be restarted to pick up the change.
///
/// # Errors
///
/// Returns `CliError::Auth` for a rejected password, or `CliError::Store`
/// if the store is missing, corrupt, or cannot be written.
pub async fn set_password(path: &Path, password: &SecretString) -> Result<(), CliError> {
    let password_hash = hash(password)?;
    let store = open_existing(path).await?;
    store
        .mutate(|doc| {
            doc.admin = AdminCredential::new(password_hash);
            Ok::<_, StoreError>(())
        })
        .await?;
    info!(path = %path.display(), "Admin password updated");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use flore_server::services::auth::verify_password;

    use super::*;
    use crate::commands::store::init;

    #[tokio::test]
    async fn test_set_password_rotates_credential() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        init(&path, Some(&SecretString::from("senha-antiga-123")))
            .await
            .unwrap();

        set_password(&path, &SecretString::from("senha-nova-456"))
            .await
            .unwrap();

        let store = open_existing(&path).await.unwrap();
        let stored = store.read(|doc| doc.admin.password_hash.clone()).await;
        assert!(verify_password("senha-nova-456", &stored).is_ok());
        assert!(verify_password("senha-antiga-123", &stored).is_err());
        assert_eq!(store.read(|doc| doc.products.len()).await, 2);
    }

    #[tokio::test]
    async fn test_set_password_rejects_short_password() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        init(&path, Some(&SecretString::from("senha-antiga-123")))
            .await
            .unwrap();
        let before = std::fs::read(&path).unwrap();

        let result = set_password(&path, &SecretString::from("curta")).await;

        assert!(matches!(result, Err(CliError::Auth(_))));
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_hash_produces_phc_string() {
        let hashed = hash(&SecretString::from("hortensias-lilas")).unwrap();
        assert!(hashed.starts_with("$argon2id$"));
    }
}
