use rusqlite::{params, Connection, OptionalExtension};

use super::{format_timestamp, parse_timestamp, Resolver, SqlEntity};
use crate::model::{EntityId, FitnessClass, Member, Reservation};
use crate::storage::error::RepositoryError;

impl SqlEntity for Reservation {
    const TABLE: &'static str = "reservations";

    fn insert(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.execute(
            "INSERT INTO reservations (id, member_id, fitness_class_id, reserved_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                self.id,
                self.member.as_ref().map(|m| m.id),
                self.fitness_class.as_ref().map(|c| c.id),
                format_timestamp(&self.reserved_at),
            ],
        )
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.execute(
            "UPDATE reservations SET member_id = ?2, fitness_class_id = ?3, reserved_at = ?4
             WHERE id = ?1",
            params![
                self.id,
                self.member.as_ref().map(|m| m.id),
                self.fitness_class.as_ref().map(|c| c.id),
                format_timestamp(&self.reserved_at),
            ],
        )
    }

    fn fetch(resolver: &mut Resolver<'_>, id: EntityId) -> Result<Option<Self>, RepositoryError> {
        let row = resolver
            .conn()
            .query_row(
                "SELECT id, member_id, fitness_class_id, reserved_at FROM reservations WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, EntityId>(0)?,
                        row.get::<_, Option<EntityId>>(1)?,
                        row.get::<_, Option<EntityId>>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((id, member_id, class_id, reserved_at)) => Ok(Some(Reservation {
                id,
                member: resolver.reference::<Member>(member_id)?,
                fitness_class: resolver.reference::<FitnessClass>(class_id)?,
                reserved_at: parse_timestamp(&reserved_at, "reserved_at")?,
            })),
            None => Ok(None),
        }
    }
}
