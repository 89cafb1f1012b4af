use rusqlite::{params, Connection, OptionalExtension};

use super::{Resolver, SqlEntity};
use crate::model::{EntityId, Trainer};
use crate::storage::error::RepositoryError;

impl SqlEntity for Trainer {
    const TABLE: &'static str = "trainers";

    fn insert(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.execute(
            "INSERT INTO trainers (id, name, mail, phone, specialization)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![self.id, self.name, self.mail, self.phone, self.specialization],
        )
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.execute(
            "UPDATE trainers SET name = ?2, mail = ?3, phone = ?4, specialization = ?5
             WHERE id = ?1",
            params![self.id, self.name, self.mail, self.phone, self.specialization],
        )
    }

    fn fetch(resolver: &mut Resolver<'_>, id: EntityId) -> Result<Option<Self>, RepositoryError> {
        let trainer = resolver
            .conn()
            .query_row(
                "SELECT id, name, mail, phone, specialization FROM trainers WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Trainer {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        mail: row.get(2)?,
                        phone: row.get(3)?,
                        specialization: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(trainer)
    }
}
