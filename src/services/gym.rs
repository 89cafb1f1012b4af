//! Gym service: cross-entity rules on top of the repositories.
//!
//! Registrations (class to member) and equipment assignments (class to
//! equipment) change only through the dedicated operations here. Updating a
//! class, member or equipment keeps the stored links whatever the caller
//! passes in, so every backend behaves the same.

use chrono::{DateTime, Utc};

use crate::model::{
    EntityId, EntityKind, Equipment, Feedback, FitnessClass, Identifiable, Location, Member,
    Membership, Reservation, Room, Trainer,
};
use crate::services::catalog::Catalog;
use crate::services::error::ServiceError;
use crate::services::repositories::Repositories;
use crate::services::schedule;
use crate::storage::ClassLinks;

/// Accepted feedback ratings.
pub const RATING_RANGE: std::ops::RangeInclusive<i32> = 1..=5;

/// Gym domain service.
pub struct GymService<'a> {
    trainers: Catalog<'a, Trainer>,
    members: Catalog<'a, Member>,
    classes: Catalog<'a, FitnessClass>,
    rooms: Catalog<'a, Room>,
    locations: Catalog<'a, Location>,
    equipment: Catalog<'a, Equipment>,
    memberships: Catalog<'a, Membership>,
    feedback: Catalog<'a, Feedback>,
    reservations: Catalog<'a, Reservation>,
    links: Box<dyn ClassLinks + 'a>,
}

impl<'a> GymService<'a> {
    pub fn new(repos: Repositories<'a>) -> Self {
        Self {
            trainers: Catalog::new(repos.trainers),
            members: Catalog::new(repos.members),
            classes: Catalog::new(repos.classes),
            rooms: Catalog::new(repos.rooms),
            locations: Catalog::new(repos.locations),
            equipment: Catalog::new(repos.equipment),
            memberships: Catalog::new(repos.memberships),
            feedback: Catalog::new(repos.feedback),
            reservations: Catalog::new(repos.reservations),
            links: repos.links,
        }
    }

    // ========== Plain catalogs ==========

    pub fn trainers(&self) -> &Catalog<'a, Trainer> {
        &self.trainers
    }

    pub fn rooms(&self) -> &Catalog<'a, Room> {
        &self.rooms
    }

    pub fn locations(&self) -> &Catalog<'a, Location> {
        &self.locations
    }

    // ========== Classes ==========

    /// Add a class, then link any members and equipment it carries.
    ///
    /// Carried members count against `participants_count`. The stored class
    /// starts without members, equipment or feedback; links fill them in.
    pub fn add_class(&self, class: &FitnessClass) -> Result<(), ServiceError> {
        if class.end_time <= class.start_time {
            return Err(ServiceError::InvalidArgument(format!(
                "Class {} ends before it starts",
                class.id
            )));
        }
        reject_repeated_ids(class.id, Member::KIND, class.members.iter().map(|m| m.id))?;
        reject_repeated_ids(class.id, Equipment::KIND, class.equipment.iter().map(|e| e.id))?;
        if class.members.len() > class.participants_count as usize {
            return Err(ServiceError::ClassFull {
                class_id: class.id,
                capacity: class.participants_count,
            });
        }
        for member in &class.members {
            self.require_argument(&self.members, member.id)?;
        }
        for item in &class.equipment {
            self.require_argument(&self.equipment, item.id)?;
        }

        let mut bare = class.clone();
        bare.members.clear();
        bare.equipment.clear();
        bare.feedback.clear();
        self.classes.add(&bare)?;
        for member in &class.members {
            self.links.link_member(class.id, member.id)?;
        }
        for item in &class.equipment {
            self.links.link_equipment(class.id, item.id)?;
        }

        tracing::debug!("Added class {} '{}'", class.id, class.name);
        Ok(())
    }

    pub fn get_class(&self, id: EntityId) -> Result<FitnessClass, ServiceError> {
        self.classes.get(id)
    }

    pub fn get_all_classes(&self) -> Result<Vec<FitnessClass>, ServiceError> {
        self.classes.list()
    }

    /// Replace a class's own fields; registrations, equipment and feedback stay.
    pub fn update_class(&self, class: &FitnessClass) -> Result<(), ServiceError> {
        if class.end_time <= class.start_time {
            return Err(ServiceError::InvalidArgument(format!(
                "Class {} ends before it starts",
                class.id
            )));
        }
        let current = self.classes.get(class.id)?;
        let mut next = class.clone();
        next.members = current.members;
        next.equipment = current.equipment;
        next.feedback = current.feedback;
        self.classes.update(&next)
    }

    /// Delete a class and its registrations and equipment assignments.
    ///
    /// Members and equipment themselves are kept.
    pub fn delete_class(&self, id: EntityId) -> Result<(), ServiceError> {
        self.classes.remove(id)?;
        self.links.purge_class(id)?;
        tracing::debug!("Deleted class {} and its links", id);
        Ok(())
    }

    // ========== Members ==========

    /// Add a member; a membership it holds must exist.
    pub fn add_member(&self, member: &Member) -> Result<(), ServiceError> {
        let membership_id = member.membership.as_ref().map(|m| m.id);
        if let Some(id) = membership_id {
            self.require_argument(&self.memberships, id)?;
        }

        let mut fresh = member.clone();
        fresh.class_ids.clear();
        self.members.add(&fresh)?;
        if let Some(id) = membership_id {
            self.links.link_holder(id, member.id)?;
        }
        Ok(())
    }

    pub fn get_member(&self, id: EntityId) -> Result<Member, ServiceError> {
        self.members.get(id)
    }

    pub fn get_all_members(&self) -> Result<Vec<Member>, ServiceError> {
        self.members.list()
    }

    /// Replace a member's own fields; registrations stay.
    pub fn update_member(&self, member: &Member) -> Result<(), ServiceError> {
        let current = self.members.get(member.id)?;
        let previous = current.membership.as_ref().map(|m| m.id);
        let next_membership = member.membership.as_ref().map(|m| m.id);
        if let Some(id) = next_membership {
            self.require_argument(&self.memberships, id)?;
        }

        let mut next = member.clone();
        next.class_ids = current.class_ids;
        self.members.update(&next)?;

        if previous != next_membership {
            if let Some(id) = previous {
                self.links.unlink_holder(id, member.id)?;
            }
            if let Some(id) = next_membership {
                self.links.link_holder(id, member.id)?;
            }
        }
        Ok(())
    }

    /// Delete a member, dropping them from every class and membership.
    pub fn delete_member(&self, id: EntityId) -> Result<(), ServiceError> {
        self.members.remove(id)?;
        self.links.purge_member(id)?;
        tracing::debug!("Deleted member {} and their registrations", id);
        Ok(())
    }

    // ========== Memberships ==========

    /// Add a membership; its holders are whoever references it.
    pub fn add_membership(&self, membership: &Membership) -> Result<(), ServiceError> {
        let mut fresh = membership.clone();
        fresh.member_ids.clear();
        self.memberships.add(&fresh)
    }

    pub fn get_membership(&self, id: EntityId) -> Result<Membership, ServiceError> {
        self.memberships.get(id)
    }

    pub fn get_all_memberships(&self) -> Result<Vec<Membership>, ServiceError> {
        self.memberships.list()
    }

    /// Replace a membership's own fields; holders stay.
    pub fn update_membership(&self, membership: &Membership) -> Result<(), ServiceError> {
        let current = self.memberships.get(membership.id)?;
        let mut next = membership.clone();
        next.member_ids = current.member_ids;
        self.memberships.update(&next)
    }

    /// Delete a membership; its holders are left without one.
    pub fn delete_membership(&self, id: EntityId) -> Result<(), ServiceError> {
        let holders = self.get_membership_holders(id)?;
        for mut holder in holders {
            holder.membership = None;
            self.members.update(&holder)?;
        }
        self.memberships.remove(id)?;
        tracing::debug!("Deleted membership {}", id);
        Ok(())
    }

    /// Members holding the given membership.
    pub fn get_membership_holders(&self, membership_id: EntityId) -> Result<Vec<Member>, ServiceError> {
        self.memberships.get(membership_id)?;
        Ok(self
            .members
            .list()?
            .into_iter()
            .filter(|m| m.membership.as_ref().map(|p| p.id) == Some(membership_id))
            .collect())
    }

    // ========== Equipment ==========

    pub fn add_equipment(&self, item: &Equipment) -> Result<(), ServiceError> {
        let mut fresh = item.clone();
        fresh.class_ids.clear();
        self.equipment.add(&fresh)
    }

    pub fn get_equipment(&self, id: EntityId) -> Result<Equipment, ServiceError> {
        self.equipment.get(id)
    }

    pub fn get_all_equipment(&self) -> Result<Vec<Equipment>, ServiceError> {
        self.equipment.list()
    }

    /// Replace an item's own fields; assignments stay.
    pub fn update_equipment(&self, item: &Equipment) -> Result<(), ServiceError> {
        let current = self.equipment.get(item.id)?;
        let mut next = item.clone();
        next.class_ids = current.class_ids;
        self.equipment.update(&next)
    }

    /// Delete equipment and unassign it from every class.
    pub fn delete_equipment(&self, id: EntityId) -> Result<(), ServiceError> {
        self.equipment.remove(id)?;
        self.links.purge_equipment(id)?;
        tracing::debug!("Deleted equipment {} and its assignments", id);
        Ok(())
    }

    // ========== Feedback ==========

    /// Add feedback; its member and class must exist and the rating be 1 to 5.
    pub fn add_feedback(&self, feedback: &Feedback) -> Result<(), ServiceError> {
        let class_id = self.validate_feedback(feedback)?;
        self.feedback.add(feedback)?;
        self.links.link_feedback(class_id, feedback.id)?;
        Ok(())
    }

    pub fn get_feedback(&self, id: EntityId) -> Result<Feedback, ServiceError> {
        self.feedback.get(id)
    }

    pub fn get_all_feedback(&self) -> Result<Vec<Feedback>, ServiceError> {
        self.feedback.list()
    }

    /// Replace feedback, moving it between classes if its class changed.
    pub fn update_feedback(&self, feedback: &Feedback) -> Result<(), ServiceError> {
        let class_id = self.validate_feedback(feedback)?;
        let previous = self.feedback.get(feedback.id)?.fitness_class.map(|c| c.id);
        self.feedback.update(feedback)?;

        if let Some(old) = previous.filter(|old| *old != class_id) {
            self.links.unlink_feedback(old, feedback.id)?;
        }
        self.links.link_feedback(class_id, feedback.id)?;
        Ok(())
    }

    pub fn delete_feedback(&self, id: EntityId) -> Result<(), ServiceError> {
        let current = self.feedback.get(id)?;
        self.feedback.remove(id)?;
        if let Some(class) = current.fitness_class {
            self.links.unlink_feedback(class.id, id)?;
        }
        Ok(())
    }

    /// Feedback left for a class, ordered by id.
    pub fn get_class_feedback(&self, class_id: EntityId) -> Result<Vec<Feedback>, ServiceError> {
        Ok(self.classes.get(class_id)?.feedback)
    }

    /// Mean rating of a class, `None` without feedback.
    pub fn average_rating(&self, class_id: EntityId) -> Result<Option<f64>, ServiceError> {
        let feedback = self.get_class_feedback(class_id)?;
        if feedback.is_empty() {
            return Ok(None);
        }
        let total: i64 = feedback.iter().map(|f| i64::from(f.rating)).sum();
        Ok(Some(total as f64 / feedback.len() as f64))
    }

    /// Check a feedback entry and return its class id.
    fn validate_feedback(&self, feedback: &Feedback) -> Result<EntityId, ServiceError> {
        if !RATING_RANGE.contains(&feedback.rating) {
            return Err(ServiceError::InvalidArgument(format!(
                "Rating {} outside {}..={}",
                feedback.rating,
                RATING_RANGE.start(),
                RATING_RANGE.end()
            )));
        }
        let member = feedback.member.as_ref().ok_or_else(|| {
            ServiceError::InvalidArgument(format!("Feedback {} has no member", feedback.id))
        })?;
        let class = feedback.fitness_class.as_ref().ok_or_else(|| {
            ServiceError::InvalidArgument(format!("Feedback {} has no class", feedback.id))
        })?;
        self.require_argument(&self.members, member.id)?;
        self.require_argument(&self.classes, class.id)?;
        Ok(class.id)
    }

    // ========== Reservations ==========

    /// Add a reservation; its member and class must exist.
    pub fn add_reservation(&self, reservation: &Reservation) -> Result<(), ServiceError> {
        self.validate_reservation(reservation)?;
        self.reservations.add(reservation)
    }

    pub fn get_reservation(&self, id: EntityId) -> Result<Reservation, ServiceError> {
        self.reservations.get(id)
    }

    pub fn get_all_reservations(&self) -> Result<Vec<Reservation>, ServiceError> {
        self.reservations.list()
    }

    pub fn update_reservation(&self, reservation: &Reservation) -> Result<(), ServiceError> {
        self.validate_reservation(reservation)?;
        self.reservations.update(reservation)
    }

    pub fn delete_reservation(&self, id: EntityId) -> Result<(), ServiceError> {
        self.reservations.remove(id)
    }

    fn validate_reservation(&self, reservation: &Reservation) -> Result<(), ServiceError> {
        let member = reservation.member.as_ref().ok_or_else(|| {
            ServiceError::InvalidArgument(format!("Reservation {} has no member", reservation.id))
        })?;
        let class = reservation.fitness_class.as_ref().ok_or_else(|| {
            ServiceError::InvalidArgument(format!("Reservation {} has no class", reservation.id))
        })?;
        self.require_argument(&self.members, member.id)?;
        self.require_argument(&self.classes, class.id)?;
        Ok(())
    }

    // ========== Registrations ==========

    /// Register a member to a class.
    ///
    /// Re-registering is rejected with `AlreadyRegistered`; a class whose
    /// registrations reached `participants_count` is rejected with `ClassFull`.
    pub fn register_to_class(
        &self,
        member_id: EntityId,
        class_id: EntityId,
    ) -> Result<(), ServiceError> {
        let class = self.resolve_argument(&self.classes, class_id)?;
        self.require_argument(&self.members, member_id)?;

        if class.has_member(member_id) {
            return Err(ServiceError::AlreadyRegistered {
                member_id,
                class_id,
            });
        }
        if class.members.len() >= class.participants_count as usize {
            return Err(ServiceError::ClassFull {
                class_id,
                capacity: class.participants_count,
            });
        }

        self.links.link_member(class_id, member_id)?;
        tracing::info!("Member {} registered to class {}", member_id, class_id);
        Ok(())
    }

    /// Remove a member's registration from a class.
    pub fn drop_class(&self, member_id: EntityId, class_id: EntityId) -> Result<(), ServiceError> {
        let class = self.resolve_argument(&self.classes, class_id)?;
        self.require_argument(&self.members, member_id)?;

        if !class.has_member(member_id) {
            return Err(ServiceError::NotRegistered {
                member_id,
                class_id,
            });
        }

        self.links.unlink_member(class_id, member_id)?;
        tracing::info!("Member {} dropped class {}", member_id, class_id);
        Ok(())
    }

    /// Classes the member is registered to, in storage order.
    pub fn get_member_classes(&self, member_id: EntityId) -> Result<Vec<FitnessClass>, ServiceError> {
        self.members.get(member_id)?;
        Ok(self
            .classes
            .list()?
            .into_iter()
            .filter(|c| c.has_member(member_id))
            .collect())
    }

    // ========== Equipment assignment ==========

    pub fn assign_equipment(
        &self,
        equipment_id: EntityId,
        class_id: EntityId,
    ) -> Result<(), ServiceError> {
        let class = self.resolve_argument(&self.classes, class_id)?;
        self.require_argument(&self.equipment, equipment_id)?;

        if class.has_equipment(equipment_id) {
            return Err(ServiceError::AlreadyAssigned {
                equipment_id,
                class_id,
            });
        }

        self.links.link_equipment(class_id, equipment_id)?;
        tracing::debug!("Equipment {} assigned to class {}", equipment_id, class_id);
        Ok(())
    }

    pub fn unassign_equipment(
        &self,
        equipment_id: EntityId,
        class_id: EntityId,
    ) -> Result<(), ServiceError> {
        let class = self.resolve_argument(&self.classes, class_id)?;
        self.require_argument(&self.equipment, equipment_id)?;

        if !class.has_equipment(equipment_id) {
            return Err(ServiceError::NotAssigned {
                equipment_id,
                class_id,
            });
        }

        self.links.unlink_equipment(class_id, equipment_id)?;
        tracing::debug!("Equipment {} unassigned from class {}", equipment_id, class_id);
        Ok(())
    }

    // ========== Schedule queries ==========

    /// Upcoming classes, earliest first.
    pub fn sort_upcoming_classes_asc(&self) -> Result<Vec<FitnessClass>, ServiceError> {
        self.sort_upcoming_classes_asc_at(Utc::now())
    }

    pub fn sort_upcoming_classes_asc_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<FitnessClass>, ServiceError> {
        let classes = self.classes.list()?;
        Ok(schedule::upcoming_sorted(&classes, now))
    }

    /// Upcoming classes of the same type and trainer as `target`.
    ///
    /// A missing target is an `InvalidArgument`.
    pub fn get_similar_classes(
        &self,
        target: Option<&FitnessClass>,
    ) -> Result<Vec<FitnessClass>, ServiceError> {
        self.get_similar_classes_at(target, Utc::now())
    }

    pub fn get_similar_classes_at(
        &self,
        target: Option<&FitnessClass>,
        now: DateTime<Utc>,
    ) -> Result<Vec<FitnessClass>, ServiceError> {
        let target = target.ok_or_else(|| {
            ServiceError::InvalidArgument("No target class for similarity".to_string())
        })?;
        let classes = self.classes.list()?;
        Ok(schedule::similar_to(&classes, target, now))
    }

    pub fn get_trainer_upcoming_classes(
        &self,
        trainer_id: EntityId,
    ) -> Result<Vec<FitnessClass>, ServiceError> {
        self.get_trainer_upcoming_classes_at(trainer_id, Utc::now())
    }

    pub fn get_trainer_upcoming_classes_at(
        &self,
        trainer_id: EntityId,
        now: DateTime<Utc>,
    ) -> Result<Vec<FitnessClass>, ServiceError> {
        let classes = self.classes.list()?;
        Ok(schedule::trainer_upcoming(&classes, trainer_id, now))
    }

    // ========== Helpers ==========

    /// Fetch a referenced entity; a missing one is an invalid argument.
    fn resolve_argument<T: Identifiable>(
        &self,
        catalog: &Catalog<'a, T>,
        id: EntityId,
    ) -> Result<T, ServiceError> {
        catalog.find(id)?.ok_or_else(|| {
            ServiceError::InvalidArgument(format!("{} {} does not exist", T::KIND, id))
        })
    }

    fn require_argument<T: Identifiable>(
        &self,
        catalog: &Catalog<'a, T>,
        id: EntityId,
    ) -> Result<(), ServiceError> {
        if catalog.contains(id)? {
            Ok(())
        } else {
            Err(ServiceError::InvalidArgument(format!(
                "{} {} does not exist",
                T::KIND,
                id
            )))
        }
    }
}

/// Reject a class carrying the same member or equipment twice.
fn reject_repeated_ids(
    class_id: EntityId,
    kind: EntityKind,
    ids: impl Iterator<Item = EntityId>,
) -> Result<(), ServiceError> {
    let mut seen = Vec::new();
    for id in ids {
        if seen.contains(&id) {
            return Err(ServiceError::InvalidArgument(format!(
                "Class {} lists {} {} twice",
                class_id, kind, id
            )));
        }
        seen.push(id);
    }
    Ok(())
}
