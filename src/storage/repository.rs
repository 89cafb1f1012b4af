//! The persistence seam.
//!
//! `Repository` is the CRUD contract every backend honors identically.
//! `ClassLinks` maintains the relations `create`/`update` never write: the
//! two many-to-many relations (class to member, class to equipment) and the
//! derived back-reference collections (a class's feedback, a membership's
//! holders).

use crate::model::{EntityId, Identifiable};
use crate::storage::error::RepositoryError;

/// Uniform CRUD contract over an identity-bearing entity.
pub trait Repository<T: Identifiable> {
    /// Persist a new entity. Fails with `DuplicateKey` if the id is taken.
    fn create(&self, entity: &T) -> Result<(), RepositoryError>;

    /// Fetch an entity with its owned references resolved, or `None`.
    fn read(&self, id: EntityId) -> Result<Option<T>, RepositoryError>;

    /// Replace an existing entity wholesale. Fails with `NotFound` if absent.
    fn update(&self, entity: &T) -> Result<(), RepositoryError>;

    /// Remove an entity and any join rows mentioning it. Fails with `NotFound` if absent.
    fn delete(&self, id: EntityId) -> Result<(), RepositoryError>;

    /// Every stored entity in storage order.
    fn get_all(&self) -> Result<Vec<T>, RepositoryError>;

    /// Whether an entity with this id is stored.
    fn exists(&self, id: EntityId) -> Result<bool, RepositoryError> {
        Ok(self.read(id)?.is_some())
    }
}

/// Relation maintenance for classes and memberships.
///
/// Link operations are idempotent; rejecting duplicates is the caller's job.
/// A backend that derives a collection on read implements its maintenance as
/// a no-op.
pub trait ClassLinks {
    fn link_member(&self, class_id: EntityId, member_id: EntityId) -> Result<(), RepositoryError>;

    fn unlink_member(&self, class_id: EntityId, member_id: EntityId)
        -> Result<(), RepositoryError>;

    fn link_equipment(
        &self,
        class_id: EntityId,
        equipment_id: EntityId,
    ) -> Result<(), RepositoryError>;

    fn unlink_equipment(
        &self,
        class_id: EntityId,
        equipment_id: EntityId,
    ) -> Result<(), RepositoryError>;

    /// Record feedback under its class, replacing an earlier copy.
    fn link_feedback(&self, class_id: EntityId, feedback_id: EntityId)
        -> Result<(), RepositoryError>;

    fn unlink_feedback(
        &self,
        class_id: EntityId,
        feedback_id: EntityId,
    ) -> Result<(), RepositoryError>;

    /// Record a member as holder of a membership.
    fn link_holder(&self, membership_id: EntityId, member_id: EntityId)
        -> Result<(), RepositoryError>;

    fn unlink_holder(
        &self,
        membership_id: EntityId,
        member_id: EntityId,
    ) -> Result<(), RepositoryError>;

    /// Drop every link mentioning the class.
    fn purge_class(&self, class_id: EntityId) -> Result<(), RepositoryError>;

    /// Drop every link mentioning the member, holder entries included.
    fn purge_member(&self, member_id: EntityId) -> Result<(), RepositoryError>;

    /// Drop every link mentioning the equipment.
    fn purge_equipment(&self, equipment_id: EntityId) -> Result<(), RepositoryError>;
}
