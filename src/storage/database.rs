//! SQLite connection and schema migration using rusqlite.

use std::path::Path;

use rusqlite::{Connection, Result as SqliteResult};
use thiserror::Error;

use crate::storage::error::RepositoryError;
use crate::storage::schema::{
    CURRENT_VERSION, ENTITY_TABLES, JOIN_TABLES, MIGRATION_V1_TO_V2, SCHEMA, SCHEMA_VERSION_TABLE,
};

/// Database wrapper owning the SQLite connection.
///
/// Relational repositories borrow the connection for their lifetime.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create a database at the given path.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DatabaseError::IoError(e.to_string()))?;
            }
        }

        let conn =
            Connection::open(path).map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    fn initialize(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(SCHEMA_VERSION_TABLE)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        let current_version = self.schema_version()?;

        if current_version < CURRENT_VERSION {
            self.migrate(current_version)?;
        }

        Ok(())
    }

    /// The applied schema version, 0 for a fresh database.
    pub fn schema_version(&self) -> Result<i32, DatabaseError> {
        let result: SqliteResult<i32> = self.conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        );

        match result {
            Ok(version) => Ok(version),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
            Err(e) => Err(DatabaseError::QueryFailed(e.to_string())),
        }
    }

    fn migrate(&self, from_version: i32) -> Result<(), DatabaseError> {
        if from_version < 1 {
            self.conn
                .execute_batch(SCHEMA)
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
            self.record_version(1)?;
        }

        if from_version < 2 {
            self.conn
                .execute_batch(MIGRATION_V1_TO_V2)
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
            self.record_version(2)?;
        }

        tracing::info!(
            "Database migrated from version {} to {}",
            from_version,
            CURRENT_VERSION
        );
        Ok(())
    }

    fn record_version(&self, version: i32) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "INSERT INTO schema_version (version, applied_at) VALUES (?, datetime('now'))",
                [version],
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    /// Get a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Count rows in one of the gym's tables.
    pub fn count_rows(&self, table: &str) -> Result<usize, DatabaseError> {
        let known = table == "schema_version"
            || ENTITY_TABLES.contains(&table)
            || JOIN_TABLES.contains(&table);
        if !known {
            return Err(DatabaseError::QueryFailed(format!("unknown table {}", table)));
        }

        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(count as usize)
    }
}

/// Database bootstrap errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),
}

impl From<DatabaseError> for RepositoryError {
    fn from(e: DatabaseError) -> Self {
        RepositoryError::Backend(e.to_string())
    }
}
