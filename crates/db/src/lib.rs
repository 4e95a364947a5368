//! Record store contract and the in-memory store used when no external
//! backend is configured.

pub mod error;
pub mod memory;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use store::{Record, RecordId, Store};
