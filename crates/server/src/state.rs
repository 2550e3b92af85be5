//! Application state shared across handlers.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use flore_core::{AdminCredential, StoreDocument};

use crate::config::ServerConfig;
use crate::services::auth::{AuthService, hash_password};
use crate::services::{AnalyticsService, CatalogService, DashboardService};
use crate::store::{DocumentStore, JsonFileBackend, OpenOutcome, StoreError};

/// The production store type.
pub type Store = DocumentStore<JsonFileBackend>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// document store, the auth service and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    store: Store,
    auth: AuthService,
}

impl AppState {
    /// Create a new application state around an opened store.
    #[must_use]
    pub fn new(config: ServerConfig, store: Store) -> Self {
        let auth = AuthService::new(&config.jwt_secret);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                auth,
            }),
        }
    }

    /// Open the store named by `config` and build the state.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be loaded or bootstrapped.
    pub async fn open(config: ServerConfig) -> Result<Self, StoreError> {
        let store = open_store(&config).await?;
        Ok(Self::new(config, store))
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the document store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    /// Get a reference to the auth service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// Catalog service over the store.
    #[must_use]
    pub fn catalog(&self) -> CatalogService<'_, JsonFileBackend> {
        CatalogService::new(self.store())
    }

    /// Analytics service over the store, with the configured retention.
    #[must_use]
    pub fn analytics(&self) -> AnalyticsService<'_, JsonFileBackend> {
        AnalyticsService::new(self.store(), self.config().analytics_max_events)
    }

    /// Dashboard service over the store.
    #[must_use]
    pub fn dashboard(&self) -> DashboardService<'_, JsonFileBackend> {
        DashboardService::new(self.store())
    }
}

/// Open the JSON store at `config.data_path`, bootstrapping it if empty.
///
/// # Errors
///
/// Returns `StoreError` if loading fails, or `StoreError::Bootstrap` if the
/// store is empty and no usable `ADMIN_PASSWORD` is configured.
pub async fn open_store(config: &ServerConfig) -> Result<Store, StoreError> {
    let backend = JsonFileBackend::new(&config.data_path);
    let password = config.admin_password.as_ref();
    let (store, outcome) = DocumentStore::open(backend, || seed_document(password)).await?;
    if outcome == OpenOutcome::Bootstrapped {
        tracing::warn!(
            path = %config.data_path.display(),
            "Store was empty; seeded default catalog and admin credential from ADMIN_PASSWORD"
        );
    }
    Ok(store)
}

/// Build the default document, hashing `admin_password` into it.
///
/// # Errors
///
/// Returns `StoreError::Bootstrap` if no password is given or it is rejected.
pub fn seed_document(admin_password: Option<&SecretString>) -> Result<StoreDocument, StoreError> {
    let password = admin_password.ok_or_else(|| {
        StoreError::Bootstrap(
            "ADMIN_PASSWORD must be set to initialize an empty store".to_string(),
        )
    })?;
    let hash = hash_password(password.expose_secret())
        .map_err(|e| StoreError::Bootstrap(format!("cannot hash ADMIN_PASSWORD: {e}")))?;
    Ok(StoreDocument::with_defaults(AdminCredential::new(hash)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::auth::verify_password;

    #[test]
    fn test_seed_requires_password() {
        assert!(matches!(seed_document(None), Err(StoreError::Bootstrap(_))));
        assert!(matches!(
            seed_document(Some(&SecretString::from("short"))),
            Err(StoreError::Bootstrap(_))
        ));
    }

    #[test]
    fn test_seed_hashes_password() {
        let doc = seed_document(Some(&SecretString::from("flores-do-campo"))).unwrap();
        assert!(!doc.admin.password_hash.contains("flores-do-campo"));
        assert!(verify_password("flores-do-campo", &doc.admin.password_hash).is_ok());
    }

    #[tokio::test]
    async fn test_open_existing_store_needs_no_password() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ServerConfig::for_tests(dir.path().join("db.json"));
        config.admin_password = Some(SecretString::from("flores-do-campo"));
        drop(open_store(&config).await.unwrap());

        config.admin_password = None;
        let state = AppState::open(config).await.unwrap();
        assert_eq!(state.catalog().list_categories().await.len(), 2);
    }

    #[tokio::test]
    async fn test_open_empty_store_without_password_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::for_tests(dir.path().join("db.json"));
        assert!(matches!(
            open_store(&config).await,
            Err(StoreError::Bootstrap(_))
        ));
        assert!(!dir.path().join("db.json").exists());
    }
}
