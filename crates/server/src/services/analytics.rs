//! Analytics ingestion.
//!
//! Events are appended in arrival order. With a retention bound configured,
//! the oldest events are dropped in the same mutation that appends the new
//! one, so the stored collection never exceeds the bound.

use std::num::NonZeroUsize;

use chrono::Utc;
use serde_json::Value;
use tracing::instrument;

use flore_core::{AnalyticsEvent, EventId};

use crate::services::CatalogError;
use crate::store::{DocumentStore, StorageBackend};

/// Analytics service.
pub struct AnalyticsService<'a, B: StorageBackend> {
    store: &'a DocumentStore<B>,
    max_events: Option<NonZeroUsize>,
}

impl<'a, B: StorageBackend> AnalyticsService<'a, B> {
    /// Create an analytics service. `max_events` of `None` keeps everything.
    #[must_use]
    pub const fn new(store: &'a DocumentStore<B>, max_events: Option<NonZeroUsize>) -> Self {
        Self { store, max_events }
    }

    /// Record a client event.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if `payload` is not a JSON object,
    /// or `CatalogError::Store` if the commit fails.
    #[instrument(skip(self, payload))]
    pub async fn record(&self, payload: Value) -> Result<EventId, CatalogError> {
        let event = AnalyticsEvent::record(payload, Utc::now())?;
        let max_events = self.max_events;

        self.store
            .mutate(|doc| {
                let id = event.id;
                doc.analytics.push(event);
                if let Some(max) = max_events {
                    let excess = doc.analytics.len().saturating_sub(max.get());
                    if excess > 0 {
                        doc.analytics.drain(..excess);
                        tracing::debug!(dropped = excess, "Analytics retention applied");
                    }
                }
                Ok(id)
            })
            .await
    }

    /// All stored events, oldest first.
    pub async fn events(&self) -> Vec<AnalyticsEvent> {
        self.store.read(|doc| doc.analytics.clone()).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use flore_core::{AdminCredential, StoreDocument};

    use super::*;
    use crate::store::{JsonFileBackend, MemoryBackend, StoreError};

    fn seed() -> Result<StoreDocument, StoreError> {
        Ok(StoreDocument::with_defaults(AdminCredential::new(String::new())))
    }

    #[tokio::test]
    async fn test_record_assigns_server_fields() {
        let (store, _) = DocumentStore::open(MemoryBackend::new(), seed).await.unwrap();
        let analytics = AnalyticsService::new(&store, None);

        let id = analytics
            .record(json!({ "type": "page_view", "id": "forged" }))
            .await
            .unwrap();

        let events = analytics.events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, id);
        assert_eq!(events[0].payload.get("type"), Some(&json!("page_view")));
        assert!(events[0].payload.get("id").is_none());
    }

    #[tokio::test]
    async fn test_record_rejects_non_object() {
        let (store, _) = DocumentStore::open(MemoryBackend::new(), seed).await.unwrap();
        let analytics = AnalyticsService::new(&store, None);

        for bad in [json!("click"), json!([1, 2]), json!(null)] {
            assert!(matches!(
                analytics.record(bad).await,
                Err(CatalogError::Validation(_))
            ));
        }
        assert!(analytics.events().await.is_empty());
    }

    #[tokio::test]
    async fn test_retention_keeps_newest() {
        let (store, _) = DocumentStore::open(MemoryBackend::new(), seed).await.unwrap();
        let analytics = AnalyticsService::new(&store, NonZeroUsize::new(3));

        for n in 1..=5 {
            analytics.record(json!({ "n": n })).await.unwrap();
        }

        let kept: Vec<_> = analytics
            .events()
            .await
            .iter()
            .map(|e| e.payload["n"].clone())
            .collect();
        assert_eq!(kept, vec![json!(3), json!(4), json!(5)]);
    }

    #[tokio::test]
    async fn test_concurrent_records_are_all_kept() {
        let (store, _) = DocumentStore::open(MemoryBackend::new(), seed).await.unwrap();
        let store = Arc::new(store);

        let tasks: Vec<_> = (0..50)
            .map(|n| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    AnalyticsService::new(&*store, None)
                        .record(json!({ "type": "click", "n": n }))
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let events = AnalyticsService::new(&*store, None).events().await;
        let ids: std::collections::HashSet<_> = events.iter().map(|e| e.id).collect();
        assert_eq!(events.len(), 50);
        assert_eq!(ids.len(), 50);
    }

    #[tokio::test]
    async fn test_recorded_event_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");

        let (store, _) = DocumentStore::open(JsonFileBackend::new(&path), seed).await.unwrap();
        let id = AnalyticsService::new(&store, None)
            .record(json!({ "type": "whatsapp_click" }))
            .await
            .unwrap();
        drop(store);

        let (reopened, _) = DocumentStore::open(JsonFileBackend::new(&path), seed).await.unwrap();
        let events = AnalyticsService::new(&reopened, None).events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, id);
    }
}
