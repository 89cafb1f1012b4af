//! Services module: gym rules over the repository layer.

pub mod catalog;
pub mod error;
pub mod gym;
pub mod repositories;
pub mod schedule;

pub use catalog::Catalog;
pub use error::ServiceError;
pub use gym::GymService;
pub use repositories::Repositories;
