//! Durable storage backends for the document store.
//!
//! A backend moves opaque bytes; it knows nothing about the document
//! format. `read` returns `None` when nothing has been stored yet.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Durable byte storage for a single document.
pub trait StorageBackend: Send + Sync + 'static {
    /// Read the stored bytes, or `None` if nothing was ever stored.
    fn read(&self) -> impl Future<Output = io::Result<Option<Vec<u8>>>> + Send;

    /// Replace the stored bytes in full.
    fn write(&self, bytes: Vec<u8>) -> impl Future<Output = io::Result<()>> + Send;

    /// Human-readable location for logs.
    fn describe(&self) -> String;
}

// =============================================================================
// JSON file
// =============================================================================

/// Stores the document in a single JSON file.
///
/// Writes go to a sibling `.tmp` file which is then renamed over the target,
/// so readers never observe a half-written document. Parent directories are
/// created on first write.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    /// Create a backend for `path`. Nothing is touched until the first read
    /// or write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The document path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StorageBackend for JsonFileBackend {
    async fn read(&self) -> io::Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn write(&self, bytes: Vec<u8>) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes).await?;
        tokio::fs::rename(&temp, &self.path).await
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// =============================================================================
// In-memory
// =============================================================================

/// Keeps the document in memory. Used by tests.
///
/// Writes can be made to fail on demand to exercise persistence-failure
/// handling.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    bytes: Mutex<Option<Vec<u8>>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryBackend {
    /// An empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend pre-loaded with `bytes`.
    #[must_use]
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Mutex::new(Some(bytes.into())),
            ..Self::default()
        }
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// The currently stored bytes.
    #[must_use]
    pub fn bytes(&self) -> Option<Vec<u8>> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StorageBackend for MemoryBackend {
    async fn read(&self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.bytes())
    }

    async fn write(&self, bytes: Vec<u8>) -> io::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "memory backend is read-only",
            ));
        }
        *self.bytes.lock().unwrap_or_else(PoisonError::into_inner) = Some(bytes);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
