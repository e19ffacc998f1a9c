//! Processed-document tracking.
//!
//! Screens that post follow-up work for a document (e.g. printing a disposal
//! certificate) remember which documents they already handled. The record is
//! keyed by document key and lives behind [`ProcessedStore`], so callers pick
//! the storage (memory, browser storage bridge, database).

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use crate::aggregate::AggregatedDocument;

/// Storage for processed-document markers.
pub trait ProcessedStore: Send + Sync {
    /// When the document was marked processed, if it was.
    fn get(&self, document_key: &str) -> Option<DateTime<Utc>>;
    fn insert(&self, document_key: String, processed_at: DateTime<Utc>);
    /// Returns `true` if a marker was removed.
    fn remove(&self, document_key: &str) -> bool;
    /// Drop markers recorded strictly before `cutoff`; returns how many were dropped.
    fn remove_before(&self, cutoff: DateTime<Utc>) -> usize;
    fn clear(&self);
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S> ProcessedStore for Arc<S>
where
    S: ProcessedStore + ?Sized,
{
    fn get(&self, document_key: &str) -> Option<DateTime<Utc>> {
        (**self).get(document_key)
    }

    fn insert(&self, document_key: String, processed_at: DateTime<Utc>) {
        (**self).insert(document_key, processed_at)
    }

    fn remove(&self, document_key: &str) -> bool {
        (**self).remove(document_key)
    }

    fn remove_before(&self, cutoff: DateTime<Utc>) -> usize {
        (**self).remove_before(cutoff)
    }

    fn clear(&self) {
        (**self).clear()
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

/// In-memory store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryProcessedStore {
    inner: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl InMemoryProcessedStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProcessedStore for InMemoryProcessedStore {
    fn get(&self, document_key: &str) -> Option<DateTime<Utc>> {
        let map = self.inner.read().ok()?;
        map.get(document_key).copied()
    }

    fn insert(&self, document_key: String, processed_at: DateTime<Utc>) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(document_key, processed_at);
        }
    }

    fn remove(&self, document_key: &str) -> bool {
        match self.inner.write() {
            Ok(mut map) => map.remove(document_key).is_some(),
            Err(_) => false,
        }
    }

    fn remove_before(&self, cutoff: DateTime<Utc>) -> usize {
        match self.inner.write() {
            Ok(mut map) => {
                let before = map.len();
                map.retain(|_k, at| *at >= cutoff);
                before - map.len()
            }
            Err(_) => 0,
        }
    }

    fn clear(&self) {
        if let Ok(mut map) = self.inner.write() {
            map.clear();
        }
    }

    fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }
}

/// Tracks which aggregated documents a caller has already handled.
#[derive(Debug)]
pub struct ProcessedDocuments<S>
where
    S: ProcessedStore,
{
    store: S,
}

impl<S> ProcessedDocuments<S>
where
    S: ProcessedStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Mark a document processed. Re-marking refreshes the timestamp.
    pub fn mark_processed(&self, document_key: impl Into<String>, processed_at: DateTime<Utc>) {
        self.store.insert(document_key.into(), processed_at);
    }

    pub fn is_processed(&self, document_key: &str) -> bool {
        self.store.get(document_key).is_some()
    }

    pub fn processed_at(&self, document_key: &str) -> Option<DateTime<Utc>> {
        self.store.get(document_key)
    }

    /// Forget one document. Returns `true` if it was marked.
    pub fn evict(&self, document_key: &str) -> bool {
        self.store.remove(document_key)
    }

    /// Forget documents processed before `cutoff`.
    pub fn evict_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        let evicted = self.store.remove_before(cutoff);
        if evicted > 0 {
            tracing::debug!(evicted, %cutoff, "evicted processed-document markers");
        }
        evicted
    }

    /// Forget everything.
    pub fn reset(&self) {
        self.store.clear();
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Documents not yet marked processed, in input order.
    pub fn filter_unprocessed(
        &self,
        documents: Vec<AggregatedDocument>,
    ) -> Vec<AggregatedDocument> {
        documents
            .into_iter()
            .filter(|d| !self.is_processed(&d.key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::aggregate::aggregate_by_document;
    use crate::movement::{LedgerMovement, MovementType};
    use stockledger_core::{MovementId, ProductId};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, day, 12, 0, 0).unwrap()
    }

    fn receipt(reference: &str, day: u32) -> LedgerMovement {
        LedgerMovement {
            id: MovementId::new(),
            product_id: ProductId::new(),
            product_name: "Flour 25kg".to_string(),
            quantity: 10.0,
            movement_type: MovementType::Receipt,
            document_reference: Some(reference.to_string()),
            reference_id: None,
            event_timestamp: at(day),
            user_id: None,
            warehouse_name: None,
            notes: None,
        }
    }

    #[test]
    fn mark_and_evict_single_document() {
        let processed = ProcessedDocuments::new(InMemoryProcessedStore::new());
        assert!(!processed.is_processed("GR-1"));

        processed.mark_processed("GR-1", at(1));
        assert!(processed.is_processed("GR-1"));
        assert_eq!(processed.processed_at("GR-1"), Some(at(1)));

        assert!(processed.evict("GR-1"));
        assert!(!processed.evict("GR-1"));
        assert!(processed.is_empty());
    }

    #[test]
    fn evict_older_than_keeps_recent_markers() {
        let processed = ProcessedDocuments::new(InMemoryProcessedStore::new());
        processed.mark_processed("GR-1", at(1));
        processed.mark_processed("GR-2", at(5));
        processed.mark_processed("GR-3", at(9));

        assert_eq!(processed.evict_older_than(at(5)), 1);
        assert!(!processed.is_processed("GR-1"));
        assert!(processed.is_processed("GR-2"));
        assert_eq!(processed.len(), 2);
    }

    #[test]
    fn reset_clears_everything() {
        let processed = ProcessedDocuments::new(InMemoryProcessedStore::new());
        processed.mark_processed("GR-1", at(1));
        processed.mark_processed("GR-2", at(2));
        processed.reset();
        assert!(processed.is_empty());
    }

    #[test]
    fn filter_unprocessed_hides_handled_documents() {
        let docs =
            aggregate_by_document(&[receipt("GR-1", 1), receipt("GR-2", 2), receipt("GR-3", 3)]);
        let processed = ProcessedDocuments::new(InMemoryProcessedStore::new());
        processed.mark_processed("GR-2", at(4));

        let keys: Vec<_> = processed
            .filter_unprocessed(docs)
            .into_iter()
            .map(|d| d.key)
            .collect();
        assert_eq!(keys, vec!["GR-3", "GR-1"]);
    }

    #[test]
    fn shared_store_is_visible_through_every_handle() {
        let store = Arc::new(InMemoryProcessedStore::new());
        let a = ProcessedDocuments::new(store.clone());
        let b = ProcessedDocuments::new(store);

        a.mark_processed("DSP-7", at(3));
        assert!(b.is_processed("DSP-7"));
    }
}
