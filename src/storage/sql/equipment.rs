use rusqlite::{params, Connection, OptionalExtension};

use super::{delete_equipment_links, Resolver, SqlEntity};
use crate::model::{EntityId, Equipment};
use crate::storage::error::RepositoryError;

impl SqlEntity for Equipment {
    const TABLE: &'static str = "equipment";

    fn insert(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.execute(
            "INSERT INTO equipment (id, name, quantity) VALUES (?1, ?2, ?3)",
            params![self.id, self.name, self.quantity],
        )
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.execute(
            "UPDATE equipment SET name = ?2, quantity = ?3 WHERE id = ?1",
            params![self.id, self.name, self.quantity],
        )
    }

    fn fetch(resolver: &mut Resolver<'_>, id: EntityId) -> Result<Option<Self>, RepositoryError> {
        let equipment = resolver
            .conn()
            .query_row(
                "SELECT id, name, quantity FROM equipment WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Equipment {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        quantity: row.get(2)?,
                        class_ids: Vec::new(),
                    })
                },
            )
            .optional()?;

        match equipment {
            Some(mut equipment) => {
                equipment.class_ids = resolver.ids(
                    "SELECT fitness_class_id FROM class_equipment
                     WHERE equipment_id = ?1 ORDER BY fitness_class_id",
                    id,
                )?;
                Ok(Some(equipment))
            }
            None => Ok(None),
        }
    }

    fn delete_links(conn: &Connection, id: EntityId) -> rusqlite::Result<()> {
        delete_equipment_links(conn, id)
    }
}
