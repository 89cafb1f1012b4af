//! Entity type definitions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identity of an entity within its repository.
pub type EntityId = i64;

/// Anything persisted through a repository.
pub trait Identifiable {
    /// Kind named in errors and log events.
    const KIND: EntityKind;

    /// The caller-assigned identity.
    fn id(&self) -> EntityId;
}

/// The kinds of entity managed by the gym.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Trainer,
    Member,
    FitnessClass,
    Room,
    Location,
    Equipment,
    Membership,
    Feedback,
    Reservation,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Trainer => "Trainer",
            EntityKind::Member => "Member",
            EntityKind::FitnessClass => "Fitness class",
            EntityKind::Room => "Room",
            EntityKind::Location => "Location",
            EntityKind::Equipment => "Equipment",
            EntityKind::Membership => "Membership",
            EntityKind::Feedback => "Feedback",
            EntityKind::Reservation => "Reservation",
        };
        write!(f, "{}", name)
    }
}

/// A gym site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: EntityId,
    pub name: String,
    pub address: String,
}

impl Location {
    pub fn new(id: EntityId, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            address: address.into(),
        }
    }
}

/// A room inside a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: EntityId,
    pub name: String,
    /// Maximum number of people the room holds
    pub max_capacity: u32,
    pub location: Option<Location>,
}

impl Room {
    pub fn new(id: EntityId, name: impl Into<String>, max_capacity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            max_capacity,
            location: None,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

/// A trainer who leads classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trainer {
    pub id: EntityId,
    pub name: String,
    pub mail: String,
    pub phone: String,
    pub specialization: String,
}

impl Trainer {
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        mail: impl Into<String>,
        phone: impl Into<String>,
        specialization: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            mail: mail.into(),
            phone: phone.into(),
            specialization: specialization.into(),
        }
    }
}

/// A membership plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub id: EntityId,
    /// Plan name, e.g. "monthly" or "premium"
    pub membership_type: String,
    pub price: f64,
    /// Members holding this plan, derived on read
    pub member_ids: Vec<EntityId>,
}

impl Membership {
    pub fn new(id: EntityId, membership_type: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            membership_type: membership_type.into(),
            price,
            member_ids: Vec::new(),
        }
    }
}

/// A registered gym member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: EntityId,
    pub name: String,
    pub mail: String,
    pub phone: String,
    pub registration_date: NaiveDate,
    pub membership: Option<Membership>,
    /// Classes the member is registered to
    pub class_ids: Vec<EntityId>,
}

impl Member {
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        mail: impl Into<String>,
        phone: impl Into<String>,
        registration_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            mail: mail.into(),
            phone: phone.into(),
            registration_date,
            membership: None,
            class_ids: Vec::new(),
        }
    }

    pub fn with_membership(mut self, membership: Membership) -> Self {
        self.membership = Some(membership);
        self
    }
}

/// A piece of equipment that classes may require.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: EntityId,
    pub name: String,
    pub quantity: u32,
    /// Classes using this equipment
    pub class_ids: Vec<EntityId>,
}

impl Equipment {
    pub fn new(id: EntityId, name: impl Into<String>, quantity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            quantity,
            class_ids: Vec::new(),
        }
    }
}

/// A scheduled class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessClass {
    pub id: EntityId,
    /// Class type, e.g. "yoga"
    pub name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub trainer: Option<Trainer>,
    pub room: Option<Room>,
    /// Capacity of the class
    pub participants_count: u32,
    pub location: Option<Location>,
    pub feedback: Vec<Feedback>,
    pub members: Vec<Member>,
    pub equipment: Vec<Equipment>,
}

impl FitnessClass {
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        participants_count: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            start_time,
            end_time,
            trainer: None,
            room: None,
            participants_count,
            location: None,
            feedback: Vec::new(),
            members: Vec::new(),
            equipment: Vec::new(),
        }
    }

    pub fn with_trainer(mut self, trainer: Trainer) -> Self {
        self.trainer = Some(trainer);
        self
    }

    pub fn with_room(mut self, room: Room) -> Self {
        self.room = Some(room);
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn trainer_id(&self) -> Option<EntityId> {
        self.trainer.as_ref().map(|t| t.id)
    }

    /// Whether the member is among this class's registrants.
    pub fn has_member(&self, member_id: EntityId) -> bool {
        self.members.iter().any(|m| m.id == member_id)
    }

    pub fn has_equipment(&self, equipment_id: EntityId) -> bool {
        self.equipment.iter().any(|e| e.id == equipment_id)
    }

    /// Whether the class starts strictly after `now`.
    pub fn starts_after(&self, now: DateTime<Utc>) -> bool {
        self.start_time > now
    }
}

/// A member's rating of a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: EntityId,
    pub member: Option<Member>,
    /// `None` when loaded as part of its own class
    pub fitness_class: Option<Box<FitnessClass>>,
    pub rating: i32,
    pub comment: String,
}

impl Feedback {
    pub fn new(id: EntityId, rating: i32, comment: impl Into<String>) -> Self {
        Self {
            id,
            member: None,
            fitness_class: None,
            rating,
            comment: comment.into(),
        }
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.member = Some(member);
        self
    }

    pub fn with_class(mut self, fitness_class: FitnessClass) -> Self {
        self.fitness_class = Some(Box::new(fitness_class));
        self
    }
}

/// A member's reservation of a class slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: EntityId,
    pub member: Option<Member>,
    pub fitness_class: Option<FitnessClass>,
    pub reserved_at: DateTime<Utc>,
}

impl Reservation {
    pub fn new(id: EntityId, reserved_at: DateTime<Utc>) -> Self {
        Self {
            id,
            member: None,
            fitness_class: None,
            reserved_at,
        }
    }
}

macro_rules! impl_identifiable {
    ($($ty:ident),* $(,)?) => {
        $(
            impl Identifiable for $ty {
                const KIND: EntityKind = EntityKind::$ty;

                fn id(&self) -> EntityId {
                    self.id
                }
            }
        )*
    };
}

impl_identifiable!(
    Location,
    Room,
    Trainer,
    Membership,
    Member,
    Equipment,
    FitnessClass,
    Feedback,
    Reservation,
);
