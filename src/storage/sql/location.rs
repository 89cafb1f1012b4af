use rusqlite::{params, Connection, OptionalExtension};

use super::{Resolver, SqlEntity};
use crate::model::{EntityId, Location};
use crate::storage::error::RepositoryError;

impl SqlEntity for Location {
    const TABLE: &'static str = "locations";

    fn insert(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.execute(
            "INSERT INTO locations (id, name, address) VALUES (?1, ?2, ?3)",
            params![self.id, self.name, self.address],
        )
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.execute(
            "UPDATE locations SET name = ?2, address = ?3 WHERE id = ?1",
            params![self.id, self.name, self.address],
        )
    }

    fn fetch(resolver: &mut Resolver<'_>, id: EntityId) -> Result<Option<Self>, RepositoryError> {
        let location = resolver
            .conn()
            .query_row(
                "SELECT id, name, address FROM locations WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Location {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        address: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(location)
    }
}
