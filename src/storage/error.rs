//! Repository error taxonomy shared by every backend.

use thiserror::Error;

use crate::model::{EntityId, EntityKind};

/// Errors raised by repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{kind} {id} already exists")]
    DuplicateKey { kind: EntityKind, id: EntityId },

    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: EntityId },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Backend failure: {0}")]
    Backend(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl RepositoryError {
    /// Whether the underlying storage call itself failed.
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            RepositoryError::Backend(_) | RepositoryError::Deserialization(_)
        )
    }
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(e: rusqlite::Error) -> Self {
        RepositoryError::Backend(e.to_string())
    }
}

impl From<std::io::Error> for RepositoryError {
    fn from(e: std::io::Error) -> Self {
        RepositoryError::Backend(e.to_string())
    }
}
