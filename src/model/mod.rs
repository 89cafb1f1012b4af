//! Gym domain entities.
//!
//! Every entity carries a caller-assigned integer identity. Owned references
//! (a class's trainer, a room's location) are embedded values; back-reference
//! collections that would otherwise cycle are kept as id lists.

pub mod types;

pub use types::{
    EntityId, EntityKind, Equipment, Feedback, FitnessClass, Identifiable, Location, Member,
    Membership, Reservation, Room, Trainer,
};
