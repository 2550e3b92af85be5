//! Admin dashboard service.

use flore_core::Dashboard;

use crate::store::{DocumentStore, StorageBackend};

/// Dashboard service. Recomputes the aggregate on every call.
pub struct DashboardService<'a, B: StorageBackend> {
    store: &'a DocumentStore<B>,
}

impl<'a, B: StorageBackend> DashboardService<'a, B> {
    #[must_use]
    pub const fn new(store: &'a DocumentStore<B>) -> Self {
        Self { store }
    }

    /// Compute the dashboard from the current document.
    pub async fn compute(&self) -> Dashboard {
        self.store.read(Dashboard::compute).await
    }
}
