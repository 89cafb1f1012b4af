use rusqlite::{params, Connection, OptionalExtension};

use super::{delete_class_links, format_timestamp, parse_timestamp, Resolver, SqlEntity};
use crate::model::{
    EntityId, Equipment, Feedback, FitnessClass, Location, Member, Room, Trainer,
};
use crate::storage::error::RepositoryError;

struct ClassRow {
    id: EntityId,
    name: String,
    start_time: String,
    end_time: String,
    trainer_id: Option<EntityId>,
    room_id: Option<EntityId>,
    participants_count: u32,
    location_id: Option<EntityId>,
}

impl SqlEntity for FitnessClass {
    const TABLE: &'static str = "fitness_classes";

    fn insert(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.execute(
            "INSERT INTO fitness_classes (id, name, start_time, end_time, trainer_id, room_id,
             participants_count, location_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                self.id,
                self.name,
                format_timestamp(&self.start_time),
                format_timestamp(&self.end_time),
                self.trainer_id(),
                self.room.as_ref().map(|r| r.id),
                self.participants_count,
                self.location.as_ref().map(|l| l.id),
            ],
        )
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.execute(
            "UPDATE fitness_classes SET name = ?2, start_time = ?3, end_time = ?4,
             trainer_id = ?5, room_id = ?6, participants_count = ?7, location_id = ?8
             WHERE id = ?1",
            params![
                self.id,
                self.name,
                format_timestamp(&self.start_time),
                format_timestamp(&self.end_time),
                self.trainer_id(),
                self.room.as_ref().map(|r| r.id),
                self.participants_count,
                self.location.as_ref().map(|l| l.id),
            ],
        )
    }

    fn fetch(resolver: &mut Resolver<'_>, id: EntityId) -> Result<Option<Self>, RepositoryError> {
        let row = resolver
            .conn()
            .query_row(
                "SELECT id, name, start_time, end_time, trainer_id, room_id,
                 participants_count, location_id FROM fitness_classes WHERE id = ?1",
                params![id],
                |row| {
                    Ok(ClassRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        start_time: row.get(2)?,
                        end_time: row.get(3)?,
                        trainer_id: row.get(4)?,
                        room_id: row.get(5)?,
                        participants_count: row.get(6)?,
                        location_id: row.get(7)?,
                    })
                },
            )
            .optional()?;

        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        let trainer = resolver.reference::<Trainer>(row.trainer_id)?;
        let room = resolver.reference::<Room>(row.room_id)?;
        let location = resolver.reference::<Location>(row.location_id)?;
        let feedback = resolver.collection::<Feedback>(
            "SELECT id FROM feedback WHERE fitness_class_id = ?1 ORDER BY id",
            row.id,
        )?;
        let members = resolver.collection::<Member>(
            "SELECT member_id FROM class_members WHERE fitness_class_id = ?1 ORDER BY member_id",
            row.id,
        )?;
        let equipment = resolver.collection::<Equipment>(
            "SELECT equipment_id FROM class_equipment
             WHERE fitness_class_id = ?1 ORDER BY equipment_id",
            row.id,
        )?;

        Ok(Some(FitnessClass {
            id: row.id,
            name: row.name,
            start_time: parse_timestamp(&row.start_time, "start_time")?,
            end_time: parse_timestamp(&row.end_time, "end_time")?,
            trainer,
            room,
            participants_count: row.participants_count,
            location,
            feedback,
            members,
            equipment,
        }))
    }

    fn delete_links(conn: &Connection, id: EntityId) -> rusqlite::Result<()> {
        delete_class_links(conn, id)
    }
}
