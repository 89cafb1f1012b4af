use rusqlite::{params, Connection, OptionalExtension};

use super::{Resolver, SqlEntity};
use crate::model::{EntityId, Location, Room};
use crate::storage::error::RepositoryError;

impl SqlEntity for Room {
    const TABLE: &'static str = "rooms";

    fn insert(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.execute(
            "INSERT INTO rooms (id, name, max_capacity, location_id) VALUES (?1, ?2, ?3, ?4)",
            params![
                self.id,
                self.name,
                self.max_capacity,
                self.location.as_ref().map(|l| l.id),
            ],
        )
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.execute(
            "UPDATE rooms SET name = ?2, max_capacity = ?3, location_id = ?4 WHERE id = ?1",
            params![
                self.id,
                self.name,
                self.max_capacity,
                self.location.as_ref().map(|l| l.id),
            ],
        )
    }

    fn fetch(resolver: &mut Resolver<'_>, id: EntityId) -> Result<Option<Self>, RepositoryError> {
        let row = resolver
            .conn()
            .query_row(
                "SELECT id, name, max_capacity, location_id FROM rooms WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        Room {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            max_capacity: row.get(2)?,
                            location: None,
                        },
                        row.get::<_, Option<EntityId>>(3)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((mut room, location_id)) => {
                room.location = resolver.reference::<Location>(location_id)?;
                Ok(Some(room))
            }
            None => Ok(None),
        }
    }
}
