use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;

/// Store-assigned record identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecordId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// A value the store can hold. Identity is `None` until the store assigns one.
pub trait Record: Clone + Send + Sync + 'static {
    /// Kind name used in errors, logs and events
    const KIND: &'static str;

    fn id(&self) -> Option<RecordId>;

    fn assign_id(&mut self, id: RecordId);
}

/// Create/save/destroy contract consumed by controllers and components.
///
/// Every operation completes asynchronously; callers decide whether to
/// await the result.
#[async_trait]
pub trait Store<T: Record>: Send + Sync {
    /// Assign a fresh identity to `record` and persist it.
    /// Any identity already present on the draft is replaced.
    async fn create(&self, record: T) -> StoreResult<T>;

    /// Persist changes to an existing record
    async fn save(&self, record: &T) -> StoreResult<T>;

    /// Remove a record permanently
    async fn destroy(&self, id: RecordId) -> StoreResult<()>;

    async fn find(&self, id: RecordId) -> StoreResult<Option<T>>;

    /// All records ordered by identity
    async fn all(&self) -> StoreResult<Vec<T>>;
}
