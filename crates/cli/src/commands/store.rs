//! Store commands: bootstrap and health check.
//!
//! # Usage
//!
//! ```bash
//! # Create the store with the default catalog (reads ADMIN_PASSWORD)
//! flore init --data data/db.json
//!
//! # Validate an existing store and print collection counts
//! flore check --data data/db.json
//! ```

use std::path::Path;

use secrecy::SecretString;
use tracing::info;

use flore_server::state::seed_document;
use flore_server::store::{DocumentStore, JsonFileBackend, OpenOutcome, StoreError};

use super::CliError;

/// Collection counts of a loaded store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSummary {
    pub products: usize,
    pub categories: usize,
    pub orders: usize,
    pub analytics: usize,
    pub settings: usize,
}

impl std::fmt::Display for StoreSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "products: {}, categories: {}, orders: {}, analytics events: {}, settings: {}",
            self.products, self.categories, self.orders, self.analytics, self.settings
        )
    }
}

/// Open an existing store, refusing to bootstrap an empty one.
///
/// # Errors
///
/// Returns `StoreError::Bootstrap` if the store is empty, or any load error.
pub async fn open_existing(path: &Path) -> Result<DocumentStore, StoreError> {
    let (store, _) = DocumentStore::open(JsonFileBackend::new(path), || {
        Err(StoreError::Bootstrap(format!(
            "{} holds no data; run `flore init` first",
            path.display()
        )))
    })
    .await?;
    Ok(store)
}

/// Bootstrap the store at `path` if it is empty.
///
/// Returns `OpenOutcome::Loaded` without touching the file if it already
/// holds data.
///
/// # Errors
///
/// Returns `CliError::Store` if the store is corrupt, or if it is empty and
/// `admin_password` is missing or too short.
pub async fn init(path: &Path, admin_password: Option<&SecretString>) -> Result<OpenOutcome, CliError> {
    let (_, outcome) =
        DocumentStore::open(JsonFileBackend::new(path), || seed_document(admin_password)).await?;
    match outcome {
        OpenOutcome::Bootstrapped => info!(path = %path.display(), "Store initialized"),
        OpenOutcome::Loaded => info!(path = %path.display(), "Store already initialized; left untouched"),
    }
    Ok(outcome)
}

/// Load and validate the store at `path`.
///
/// # Errors
///
/// Returns `CliError::Store` if the store is missing, empty or corrupt.
pub async fn check(path: &Path) -> Result<StoreSummary, CliError> {
    let store = open_existing(path).await?;
    let summary = store
        .read(|doc| StoreSummary {
            products: doc.products.len(),
            categories: doc.categories.len(),
            orders: doc.orders.len(),
            analytics: doc.analytics.len(),
            settings: doc.settings.len(),
        })
        .await;
    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_then_check() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        let password = SecretString::from("margaridas-azuis");

        assert_eq!(init(&path, Some(&password)).await.unwrap(), OpenOutcome::Bootstrapped);
        let first = std::fs::read(&path).unwrap();
        assert_eq!(init(&path, None).await.unwrap(), OpenOutcome::Loaded);
        assert_eq!(std::fs::read(&path).unwrap(), first);

        let summary = check(&path).await.unwrap();
        assert_eq!(summary.products, 2);
        assert_eq!(summary.categories, 2);
        assert_eq!(summary.orders, 0);
        assert_eq!(summary.settings, 7);
    }

    #[tokio::test]
    async fn test_init_without_password_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = init(&dir.path().join("db.json"), None).await;
        assert!(matches!(result, Err(CliError::Store(StoreError::Bootstrap(_)))));
    }

    #[tokio::test]
    async fn test_check_rejects_missing_and_corrupt_stores() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");

        assert!(matches!(
            check(&path).await,
            Err(CliError::Store(StoreError::Bootstrap(_)))
        ));
        assert!(!path.exists());

        std::fs::write(&path, r#"{"products": []}"#).unwrap();
        assert!(matches!(
            check(&path).await,
            Err(CliError::Store(StoreError::DataCorruption(_)))
        ));
    }
}
