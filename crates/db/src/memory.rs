//! In-memory record store

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use ideas_events::{ChangeKind, EventBus, StoreEvent};
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::store::{Record, RecordId, Store};

/// Store keeping records in a `BTreeMap`, so `all()` lists them in
/// identity order and freshly created records come last.
pub struct MemoryStore<T: Record> {
    records: RwLock<BTreeMap<RecordId, T>>,
    next_id: AtomicU64,
    events: Option<EventBus>,
}

impl<T: Record> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
            events: None,
        }
    }

    /// Publish a [`StoreEvent`] on `events` after every successful mutation
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Insert records keeping their identities. Records without one are
    /// assigned fresh identities. Identities already present in the store
    /// are left untouched. Returns the number of records actually inserted.
    pub async fn seed<I>(&self, fixtures: I) -> StoreResult<usize>
    where
        I: IntoIterator<Item = T>,
    {
        let mut records = self.records.write().await;
        let mut inserted = 0;
        let mut skipped = 0;

        for mut record in fixtures {
            let id = match record.id() {
                Some(id) => {
                    self.next_id
                        .fetch_max(id.get().saturating_add(1), Ordering::SeqCst);
                    id
                }
                None => {
                    let id = self.allocate_id()?;
                    record.assign_id(id);
                    id
                }
            };

            match records.entry(id) {
                Entry::Vacant(slot) => {
                    slot.insert(record);
                    inserted += 1;
                }
                Entry::Occupied(_) => skipped += 1,
            }
        }

        tracing::debug!(target: "ideas-db", kind = T::KIND, inserted, skipped, "store seeded");
        Ok(inserted)
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Next free identity. `u64::MAX` is never handed out; reaching it
    /// means the identity space is exhausted.
    fn allocate_id(&self) -> StoreResult<RecordId> {
        self.next_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |next| {
                next.checked_add(1)
            })
            .map(RecordId::new)
            .map_err(|_| StoreError::exhausted(T::KIND))
    }

    fn notify(&self, id: RecordId, change: ChangeKind) {
        if let Some(events) = &self.events {
            events.publish(StoreEvent::new(T::KIND, id.get(), change));
        }
    }
}

impl<T: Record> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> Store<T> for MemoryStore<T> {
    async fn create(&self, mut record: T) -> StoreResult<T> {
        // allocate under the lock so a concurrent seed cannot claim the id
        let mut records = self.records.write().await;
        let id = self.allocate_id()?;
        record.assign_id(id);
        records.insert(id, record.clone());
        drop(records);

        tracing::info!(target: "ideas-db", kind = T::KIND, %id, "record created");
        self.notify(id, ChangeKind::Created);
        Ok(record)
    }

    async fn save(&self, record: &T) -> StoreResult<T> {
        let id = record.id().ok_or_else(|| StoreError::not_persisted(T::KIND))?;

        {
            let mut records = self.records.write().await;
            let slot = records
                .get_mut(&id)
                .ok_or_else(|| StoreError::not_found(T::KIND, id))?;
            *slot = record.clone();
        }

        tracing::info!(target: "ideas-db", kind = T::KIND, %id, "record saved");
        self.notify(id, ChangeKind::Updated);
        Ok(record.clone())
    }

    async fn destroy(&self, id: RecordId) -> StoreResult<()> {
        self.records
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| StoreError::not_found(T::KIND, id))?;

        tracing::info!(target: "ideas-db", kind = T::KIND, %id, "record destroyed");
        self.notify(id, ChangeKind::Destroyed);
        Ok(())
    }

    async fn find(&self, id: RecordId) -> StoreResult<Option<T>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn all(&self) -> StoreResult<Vec<T>> {
        Ok(self.records.read().await.values().cloned().collect())
    }
}
