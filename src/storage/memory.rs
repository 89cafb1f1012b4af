//! Volatile in-memory backend.
//!
//! Entities are stored and returned by value: a caller mutating a returned
//! entity never changes the stored copy. A class therefore keeps the trainer,
//! room and location snapshot it was written with until it is updated, unlike
//! the relational backend which re-resolves references on every read.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::model::{EntityId, Equipment, Feedback, FitnessClass, Identifiable, Member, Membership};
use crate::storage::error::RepositoryError;
use crate::storage::repository::{ClassLinks, Repository};

/// Repository over a shared id-to-entity map.
///
/// Clones are handles onto the same store.
#[derive(Debug)]
pub struct InMemoryRepository<T> {
    entries: Arc<RwLock<BTreeMap<EntityId, T>>>,
}

impl<T> Clone for InMemoryRepository<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self {
            entries: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }
}

impl<T> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entities.
    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self.read_lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.read_lock()?.is_empty())
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<'_, BTreeMap<EntityId, T>>, RepositoryError> {
        self.entries
            .read()
            .map_err(|_| RepositoryError::Backend("in-memory store lock poisoned".to_string()))
    }

    fn write_lock(
        &self,
    ) -> Result<RwLockWriteGuard<'_, BTreeMap<EntityId, T>>, RepositoryError> {
        self.entries
            .write()
            .map_err(|_| RepositoryError::Backend("in-memory store lock poisoned".to_string()))
    }
}

impl<T: Identifiable + Clone> InMemoryRepository<T> {
    /// Apply `edit` to the stored entity in place. Returns whether it existed.
    fn modify<F>(&self, id: EntityId, edit: F) -> Result<bool, RepositoryError>
    where
        F: FnOnce(&mut T),
    {
        let mut map = self.write_lock()?;
        match map.get_mut(&id) {
            Some(entity) => {
                edit(entity);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Apply `edit` to every stored entity.
    fn modify_all<F>(&self, mut edit: F) -> Result<(), RepositoryError>
    where
        F: FnMut(&mut T),
    {
        let mut map = self.write_lock()?;
        map.values_mut().for_each(|entity| edit(entity));
        Ok(())
    }
}

impl<T: Identifiable + Clone> Repository<T> for InMemoryRepository<T> {
    fn create(&self, entity: &T) -> Result<(), RepositoryError> {
        let mut map = self.write_lock()?;
        if map.contains_key(&entity.id()) {
            return Err(RepositoryError::DuplicateKey {
                kind: T::KIND,
                id: entity.id(),
            });
        }
        map.insert(entity.id(), entity.clone());
        tracing::debug!("Stored {} {} in memory", T::KIND, entity.id());
        Ok(())
    }

    fn read(&self, id: EntityId) -> Result<Option<T>, RepositoryError> {
        Ok(self.read_lock()?.get(&id).cloned())
    }

    fn update(&self, entity: &T) -> Result<(), RepositoryError> {
        let mut map = self.write_lock()?;
        match map.get_mut(&entity.id()) {
            Some(stored) => {
                *stored = entity.clone();
                tracing::debug!("Replaced {} {} in memory", T::KIND, entity.id());
                Ok(())
            }
            None => Err(RepositoryError::NotFound {
                kind: T::KIND,
                id: entity.id(),
            }),
        }
    }

    fn delete(&self, id: EntityId) -> Result<(), RepositoryError> {
        let mut map = self.write_lock()?;
        if map.remove(&id).is_none() {
            return Err(RepositoryError::NotFound { kind: T::KIND, id });
        }
        tracing::debug!("Removed {} {} from memory", T::KIND, id);
        Ok(())
    }

    fn get_all(&self) -> Result<Vec<T>, RepositoryError> {
        Ok(self.read_lock()?.values().cloned().collect())
    }

    fn exists(&self, id: EntityId) -> Result<bool, RepositoryError> {
        Ok(self.read_lock()?.contains_key(&id))
    }
}

/// Relation maintenance over in-memory stores.
///
/// Both sides of each relation are edited: the class's embedded collection
/// and the member's or equipment's `class_ids`. A class's feedback and a
/// membership's `member_ids` are kept here too, since nothing derives them on
/// read. Collections stay ordered by id, as the relational backend returns
/// them.
#[derive(Debug, Clone)]
pub struct MemoryClassLinks {
    classes: InMemoryRepository<FitnessClass>,
    members: InMemoryRepository<Member>,
    equipment: InMemoryRepository<Equipment>,
    feedback: InMemoryRepository<Feedback>,
    memberships: InMemoryRepository<Membership>,
}

impl MemoryClassLinks {
    pub fn new(
        classes: InMemoryRepository<FitnessClass>,
        members: InMemoryRepository<Member>,
        equipment: InMemoryRepository<Equipment>,
        feedback: InMemoryRepository<Feedback>,
        memberships: InMemoryRepository<Membership>,
    ) -> Self {
        Self {
            classes,
            members,
            equipment,
            feedback,
            memberships,
        }
    }
}

fn insert_id(ids: &mut Vec<EntityId>, id: EntityId) {
    if !ids.contains(&id) {
        ids.push(id);
        ids.sort_unstable();
    }
}

/// Replace the entry with `entity`'s id, or insert it in id order.
fn upsert_by_id<T: Identifiable + Clone>(items: &mut Vec<T>, entity: &T) {
    match items.iter().position(|item| item.id() >= entity.id()) {
        Some(pos) if items[pos].id() == entity.id() => items[pos] = entity.clone(),
        Some(pos) => items.insert(pos, entity.clone()),
        None => items.push(entity.clone()),
    }
}

impl ClassLinks for MemoryClassLinks {
    fn link_member(&self, class_id: EntityId, member_id: EntityId) -> Result<(), RepositoryError> {
        let mut member = self
            .members
            .read(member_id)?
            .ok_or(RepositoryError::NotFound {
                kind: Member::KIND,
                id: member_id,
            })?;
        insert_id(&mut member.class_ids, class_id);

        let found = self
            .classes
            .modify(class_id, |class| upsert_by_id(&mut class.members, &member))?;
        if !found {
            return Err(RepositoryError::NotFound {
                kind: FitnessClass::KIND,
                id: class_id,
            });
        }

        self.members
            .modify(member_id, |stored| insert_id(&mut stored.class_ids, class_id))?;
        Ok(())
    }

    fn unlink_member(
        &self,
        class_id: EntityId,
        member_id: EntityId,
    ) -> Result<(), RepositoryError> {
        self.classes
            .modify(class_id, |class| class.members.retain(|m| m.id != member_id))?;
        self.members
            .modify(member_id, |member| member.class_ids.retain(|id| *id != class_id))?;
        Ok(())
    }

    fn link_equipment(
        &self,
        class_id: EntityId,
        equipment_id: EntityId,
    ) -> Result<(), RepositoryError> {
        let mut item = self
            .equipment
            .read(equipment_id)?
            .ok_or(RepositoryError::NotFound {
                kind: Equipment::KIND,
                id: equipment_id,
            })?;
        insert_id(&mut item.class_ids, class_id);

        let found = self
            .classes
            .modify(class_id, |class| upsert_by_id(&mut class.equipment, &item))?;
        if !found {
            return Err(RepositoryError::NotFound {
                kind: FitnessClass::KIND,
                id: class_id,
            });
        }

        self.equipment
            .modify(equipment_id, |stored| insert_id(&mut stored.class_ids, class_id))?;
        Ok(())
    }

    fn unlink_equipment(
        &self,
        class_id: EntityId,
        equipment_id: EntityId,
    ) -> Result<(), RepositoryError> {
        self.classes.modify(class_id, |class| {
            class.equipment.retain(|e| e.id != equipment_id)
        })?;
        self.equipment
            .modify(equipment_id, |item| item.class_ids.retain(|id| *id != class_id))?;
        Ok(())
    }

    fn link_feedback(&self, class_id: EntityId, feedback_id: EntityId) -> Result<(), RepositoryError> {
        let mut entry = self
            .feedback
            .read(feedback_id)?
            .ok_or(RepositoryError::NotFound {
                kind: Feedback::KIND,
                id: feedback_id,
            })?;
        // Inside its own class the feedback does not point back at it.
        entry.fitness_class = None;

        let found = self
            .classes
            .modify(class_id, |class| upsert_by_id(&mut class.feedback, &entry))?;
        if !found {
            return Err(RepositoryError::NotFound {
                kind: FitnessClass::KIND,
                id: class_id,
            });
        }
        Ok(())
    }

    fn unlink_feedback(
        &self,
        class_id: EntityId,
        feedback_id: EntityId,
    ) -> Result<(), RepositoryError> {
        self.classes
            .modify(class_id, |class| class.feedback.retain(|f| f.id != feedback_id))?;
        Ok(())
    }

    fn link_holder(&self, membership_id: EntityId, member_id: EntityId) -> Result<(), RepositoryError> {
        let found = self.memberships.modify(membership_id, |membership| {
            insert_id(&mut membership.member_ids, member_id)
        })?;
        if !found {
            return Err(RepositoryError::NotFound {
                kind: Membership::KIND,
                id: membership_id,
            });
        }
        Ok(())
    }

    fn unlink_holder(
        &self,
        membership_id: EntityId,
        member_id: EntityId,
    ) -> Result<(), RepositoryError> {
        self.memberships.modify(membership_id, |membership| {
            membership.member_ids.retain(|id| *id != member_id)
        })?;
        Ok(())
    }

    fn purge_class(&self, class_id: EntityId) -> Result<(), RepositoryError> {
        self.members
            .modify_all(|member| member.class_ids.retain(|id| *id != class_id))?;
        self.equipment
            .modify_all(|item| item.class_ids.retain(|id| *id != class_id))?;
        Ok(())
    }

    fn purge_member(&self, member_id: EntityId) -> Result<(), RepositoryError> {
        self.classes
            .modify_all(|class| class.members.retain(|m| m.id != member_id))?;
        self.memberships
            .modify_all(|membership| membership.member_ids.retain(|id| *id != member_id))
    }

    fn purge_equipment(&self, equipment_id: EntityId) -> Result<(), RepositoryError> {
        self.classes
            .modify_all(|class| class.equipment.retain(|e| e.id != equipment_id))
    }
}
