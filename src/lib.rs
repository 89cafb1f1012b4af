//! GymDesk - Gym Management Persistence Layer
//!
//! Stores trainers, members, classes, rooms, locations, equipment,
//! memberships, feedback and reservations behind one repository contract
//! with in-memory, flat-file and SQLite backends, and layers the gym's
//! registration and scheduling rules on top.

pub mod model;
pub mod services;
pub mod storage;

// Re-export commonly used types
pub use model::{EntityId, FitnessClass, Identifiable, Member};
pub use services::{GymService, Repositories, ServiceError};
pub use storage::{Database, GymConfig, Repository, RepositoryError};
