use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use strata_core::{CorrelationId, MemoryRecord, MemoryResult, MemoryStore, Tier};

/// Fast, transient memory store backed by a sharded concurrent map.
///
/// `InMemoryStore` keeps execution traces for the lifetime of the process.
/// Records for different correlation ids live in independent shards, so
/// concurrent dispatches under distinct ids do not contend on one lock.
/// Concurrent writes to the same id are last-writer-wins.
///
/// Clones share the same underlying table.
///
/// # Example
///
/// ```rust
/// use strata_core::{CorrelationId, MemoryStore, Tier};
/// use strata_memory::InMemoryStore;
///
/// let store = InMemoryStore::new();
/// let id = CorrelationId::new("abc");
///
/// let first = store.ensure(&id, Tier::Business).unwrap();
/// let again = store.ensure(&id, Tier::Personal).unwrap();
///
/// assert_eq!(first.created_at, again.created_at);
/// assert_eq!(again.tier, Tier::Business);
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: Arc<DashMap<CorrelationId, MemoryRecord>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Correlation ids currently held, in no particular order.
    pub fn correlation_ids(&self) -> Vec<CorrelationId> {
        self.records.iter().map(|entry| entry.key().clone()).collect()
    }
}

impl MemoryStore for InMemoryStore {
    fn get(&self, correlation_id: &CorrelationId) -> MemoryResult<Option<MemoryRecord>> {
        Ok(self
            .records
            .get(correlation_id)
            .map(|entry| entry.value().clone()))
    }

    fn ensure(&self, correlation_id: &CorrelationId, tier: Tier) -> MemoryResult<MemoryRecord> {
        let entry = self
            .records
            .entry(correlation_id.clone())
            .or_insert_with(|| {
                debug!(correlation_id = %correlation_id, tier = %tier, "Creating memory record");
                MemoryRecord::new(correlation_id.clone(), tier)
            });
        Ok(entry.value().clone())
    }

    fn upsert(&self, mut record: MemoryRecord) -> MemoryResult<MemoryRecord> {
        record.touch();
        debug!(
            correlation_id = %record.correlation_id,
            updated_at = %record.updated_at,
            "Storing memory record"
        );
        self.records
            .insert(record.correlation_id.clone(), record.clone());
        Ok(record)
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread;

    #[test]
    fn test_get_missing_returns_none() {
        let store = InMemoryStore::new();
        assert_eq!(store.get(&CorrelationId::new("nope")).unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let store = InMemoryStore::new();
        let id = CorrelationId::new("abc");

        let first = store.ensure(&id, Tier::Government).unwrap();
        let second = store.ensure(&id, Tier::Government).unwrap();

        assert_eq!(first.created_at, second.created_at);
        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_ensure_keeps_existing_data() {
        let store = InMemoryStore::new();
        let id = CorrelationId::new("abc");

        let mut record = store.ensure(&id, Tier::Personal).unwrap();
        record.record_run("orchestrator", json!({"plan": []}));
        store.upsert(record).unwrap();

        let again = store.ensure(&id, Tier::Business).unwrap();
        assert_eq!(again.last_agent(), Some("orchestrator"));
        assert_eq!(again.tier, Tier::Personal);
    }

    #[test]
    fn test_upsert_bumps_updated_at_and_overwrites() {
        let store = InMemoryStore::new();
        let id = CorrelationId::new("abc");

        let created = store.ensure(&id, Tier::Personal).unwrap();
        let mut record = created.clone();
        record.data.insert("step".to_string(), json!(1));
        let stored = store.upsert(record).unwrap();

        assert!(stored.updated_at > created.updated_at);
        assert_eq!(stored.created_at, created.created_at);
        assert_eq!(store.get(&id).unwrap(), Some(stored));
    }

    #[test]
    fn test_upsert_without_prior_ensure_inserts() {
        let store = InMemoryStore::new();
        let record = MemoryRecord::new(CorrelationId::new("fresh"), Tier::Business);
        store.upsert(record).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.correlation_ids(), vec![CorrelationId::new("fresh")]);
    }

    #[test]
    fn test_clones_share_records() {
        let store = InMemoryStore::new();
        let view = store.clone();
        store
            .ensure(&CorrelationId::new("shared"), Tier::Personal)
            .unwrap();
        assert!(view.get(&CorrelationId::new("shared")).unwrap().is_some());
    }

    #[test]
    fn test_concurrent_ensure_creates_one_record_per_id() {
        let store = InMemoryStore::new();

        thread::scope(|scope| {
            for worker in 0..8 {
                let store = &store;
                scope.spawn(move || {
                    for n in 0..50 {
                        let id = CorrelationId::new(format!("id-{}", n % 10));
                        let mut record = store.ensure(&id, Tier::Personal).unwrap();
                        record.data.insert("worker".to_string(), json!(worker));
                        store.upsert(record).unwrap();
                    }
                });
            }
        });

        assert_eq!(store.len(), 10);
    }
}
