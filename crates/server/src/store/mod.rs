//! Document store: the single in-memory copy of the catalog and its durable
//! JSON serialization.
//!
//! # Lifecycle
//!
//! 1. [`DocumentStore::open`] reads the backend. Empty storage is seeded from
//!    the default dataset and written immediately; existing data is loaded
//!    as-is, with no backfill of newer default fields.
//! 2. [`DocumentStore::read`] runs read-only projections.
//! 3. [`DocumentStore::mutate`] is the only way to change state: transform,
//!    then commit the whole document.
//!
//! # Concurrency
//!
//! Mutations are serialized by a single writer lock held across
//! transform-and-commit, so two concurrent mutations can never both start
//! from the same snapshot. Readers only take the document lock briefly and
//! may observe a mutation after it is applied in memory but before its
//! commit has finished.
//!
//! # Failure
//!
//! If the commit fails the in-memory document is **not** rolled back. The
//! error is returned to the caller, who must surface it as a server error.

pub mod backend;

use std::io;

use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use flore_core::{DocumentError, StoreDocument};

pub use backend::{JsonFileBackend, MemoryBackend, StorageBackend};

/// Errors that can occur during store operations.
///
/// All variants are persistence failures: fatal at startup, a generic
/// `500` inside a request.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backend failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// The document could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored data exists but is not a valid document.
    #[error("data corruption: {0}")]
    DataCorruption(#[from] DocumentError),

    /// The store is empty and the default dataset could not be built.
    #[error("bootstrap failed: {0}")]
    Bootstrap(String),
}

/// How [`DocumentStore::open`] obtained its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// Existing data was loaded.
    Loaded,
    /// Storage was empty; the default dataset was written.
    Bootstrapped,
}

/// The document store.
///
/// Generic over its [`StorageBackend`]; production uses [`JsonFileBackend`].
pub struct DocumentStore<B = JsonFileBackend> {
    backend: B,
    document: RwLock<StoreDocument>,
    writer: Mutex<()>,
}

impl<B: StorageBackend> DocumentStore<B> {
    /// Load the store from `backend`, bootstrapping it if empty.
    ///
    /// `seed` is only called when the storage holds no data. It builds the
    /// default document (and is where the admin password gets hashed).
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be read, the stored data is
    /// corrupt, `seed` fails, or the bootstrap write fails.
    pub async fn open<F>(backend: B, seed: F) -> Result<(Self, OpenOutcome), StoreError>
    where
        F: FnOnce() -> Result<StoreDocument, StoreError>,
    {
        let existing = match backend.read().await? {
            Some(bytes) => StoreDocument::parse(&bytes)?,
            None => None,
        };

        if let Some(document) = existing {
            tracing::info!(
                location = %backend.describe(),
                products = document.products.len(),
                orders = document.orders.len(),
                "Document store loaded"
            );
            return Ok((Self::from_parts(backend, document), OpenOutcome::Loaded));
        }

        let document = seed()?;
        let store = Self::from_parts(backend, document);
        store.commit().await?;
        tracing::info!(
            location = %store.backend.describe(),
            "Document store initialized with default data"
        );
        Ok((store, OpenOutcome::Bootstrapped))
    }

    fn from_parts(backend: B, document: StoreDocument) -> Self {
        Self {
            backend,
            document: RwLock::new(document),
            writer: Mutex::new(()),
        }
    }

    /// Run a read-only projection against the current document.
    pub async fn read<T>(&self, f: impl FnOnce(&StoreDocument) -> T) -> T {
        let document = self.document.read().await;
        f(&document)
    }

    /// Clone the current document.
    pub async fn snapshot(&self) -> StoreDocument {
        self.document.read().await.clone()
    }

    /// Apply `f` to the document and commit the result.
    ///
    /// `f` works on a copy. If it returns an error the document is left
    /// untouched and nothing is written. Otherwise the copy replaces the
    /// live document and the whole document is written to the backend.
    /// The writer lock is held for the entire transform and commit, so
    /// mutations form a single linear history.
    ///
    /// # Errors
    ///
    /// Returns `f`'s error unchanged, or a `StoreError` (converted into `E`)
    /// if serialization or the commit fails. On a failed commit the new
    /// document stays live in memory.
    pub async fn mutate<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut StoreDocument) -> Result<T, E>,
        E: From<StoreError>,
    {
        let _writer = self.writer.lock().await;

        let mut next = self.document.read().await.clone();
        let value = f(&mut next)?;
        let bytes = next.to_json_pretty().map_err(StoreError::from)?;

        *self.document.write().await = next;

        self.write_bytes(bytes).await?;
        Ok(value)
    }

    /// Write the current document to the backend in full.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if serialization or the write fails.
    pub async fn commit(&self) -> Result<(), StoreError> {
        let _writer = self.writer.lock().await;
        let bytes = self.document.read().await.to_json_pretty()?;
        self.write_bytes(bytes).await
    }

    async fn write_bytes(&self, bytes: Vec<u8>) -> Result<(), StoreError> {
        let len = bytes.len();
        match self.backend.write(bytes).await {
            Ok(()) => {
                tracing::debug!(bytes = len, "Document committed");
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    location = %self.backend.describe(),
                    "Document commit failed; in-memory state has diverged from storage"
                );
                Err(StoreError::Io(e))
            }
        }
    }

    /// The storage backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }
}
