//! Store double that counts calls and can hold or fail them.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use ideas_db::{MemoryStore, RecordId, Store, StoreError, StoreResult};
use tokio::sync::{Notify, Semaphore};

use super::models::Idea;

pub struct RecordingStore {
    inner: MemoryStore<Idea>,
    pub creates: AtomicUsize,
    pub saves: AtomicUsize,
    pub destroys: AtomicUsize,
    pub reads: AtomicUsize,
    fail_saves: AtomicBool,
    fail_destroys: AtomicBool,
    hold_saves: AtomicBool,
    save_permits: Semaphore,
    save_entered: Notify,
}

impl Default for RecordingStore {
    fn default() -> Self {
        Self {
            inner: MemoryStore::new(),
            creates: AtomicUsize::new(0),
            saves: AtomicUsize::new(0),
            destroys: AtomicUsize::new(0),
            reads: AtomicUsize::new(0),
            fail_saves: AtomicBool::new(false),
            fail_destroys: AtomicBool::new(false),
            hold_saves: AtomicBool::new(false),
            save_permits: Semaphore::new(0),
            save_entered: Notify::new(),
        }
    }
}

impl RecordingStore {
    pub async fn with_fixtures() -> Self {
        let store = Self::default();
        store.inner.seed(Idea::fixtures()).await.unwrap();
        store
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn fail_destroys(&self, fail: bool) {
        self.fail_destroys.store(fail, Ordering::SeqCst);
    }

    /// Saves block until `release_save` is called
    pub fn hold_saves(&self) {
        self.hold_saves.store(true, Ordering::SeqCst);
    }

    pub fn release_save(&self) {
        self.save_permits.add_permits(1);
    }

    /// Resolves once a save call has entered the store
    pub async fn save_entered(&self) {
        self.save_entered.notified().await;
    }

    pub fn calls(&self) -> (usize, usize, usize) {
        (
            self.creates.load(Ordering::SeqCst),
            self.saves.load(Ordering::SeqCst),
            self.destroys.load(Ordering::SeqCst),
        )
    }

    pub async fn stored(&self) -> Vec<Idea> {
        self.inner.all().await.unwrap()
    }
}

#[async_trait]
impl Store<Idea> for RecordingStore {
    async fn create(&self, record: Idea) -> StoreResult<Idea> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create(record).await
    }

    async fn save(&self, record: &Idea) -> StoreResult<Idea> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.save_entered.notify_one();

        if self.hold_saves.load(Ordering::SeqCst) {
            self.save_permits
                .acquire()
                .await
                .map_err(|err| StoreError::unavailable(err.to_string()))?
                .forget();
        }
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("save rejected"));
        }
        self.inner.save(record).await
    }

    async fn destroy(&self, id: RecordId) -> StoreResult<()> {
        self.destroys.fetch_add(1, Ordering::SeqCst);
        if self.fail_destroys.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("destroy rejected"));
        }
        self.inner.destroy(id).await
    }

    async fn find(&self, id: RecordId) -> StoreResult<Option<Idea>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.find(id).await
    }

    async fn all(&self) -> StoreResult<Vec<Idea>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.all().await
    }
}
