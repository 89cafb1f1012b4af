//! Storage module: the repository contract and its backends.

pub mod config;
pub mod database;
pub mod error;
pub mod file_store;
pub mod memory;
pub mod record;
pub mod repository;
pub mod schema;
pub mod sql;

pub use config::{BackendKind, ConfigError, GymConfig, StorageSettings};
pub use database::{Database, DatabaseError};
pub use error::RepositoryError;
pub use file_store::FileRepository;
pub use memory::{InMemoryRepository, MemoryClassLinks};
pub use record::FileRecord;
pub use repository::{ClassLinks, Repository};
pub use sql::{SqlClassLinks, SqlRepository};
