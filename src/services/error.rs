//! Service-level errors.

use thiserror::Error;

use crate::model::{EntityId, EntityKind};
use crate::storage::RepositoryError;

/// Errors raised by gym service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{kind} {id} already exists")]
    AlreadyExists { kind: EntityKind, id: EntityId },

    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: EntityId },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Member {member_id} is already registered to class {class_id}")]
    AlreadyRegistered { member_id: EntityId, class_id: EntityId },

    #[error("Member {member_id} is not registered to class {class_id}")]
    NotRegistered { member_id: EntityId, class_id: EntityId },

    #[error("Equipment {equipment_id} is already assigned to class {class_id}")]
    AlreadyAssigned { equipment_id: EntityId, class_id: EntityId },

    #[error("Equipment {equipment_id} is not assigned to class {class_id}")]
    NotAssigned { equipment_id: EntityId, class_id: EntityId },

    #[error("Class {class_id} is full ({capacity} participants)")]
    ClassFull { class_id: EntityId, capacity: u32 },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
