//! Error types returned by record stores

use thiserror::Error;

use crate::store::RecordId;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: RecordId },

    #[error("{kind} has not been persisted yet")]
    NotPersisted { kind: &'static str },

    #[error("no identities left for {kind}")]
    Exhausted { kind: &'static str },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found(kind: &'static str, id: RecordId) -> Self {
        Self::NotFound { kind, id }
    }

    pub fn not_persisted(kind: &'static str) -> Self {
        Self::NotPersisted { kind }
    }

    pub fn exhausted(kind: &'static str) -> Self {
        Self::Exhausted { kind }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}
