use rusqlite::{params, Connection, OptionalExtension};

use super::{Resolver, SqlEntity};
use crate::model::{EntityId, Feedback, FitnessClass, Member};
use crate::storage::error::RepositoryError;

impl SqlEntity for Feedback {
    const TABLE: &'static str = "feedback";

    fn insert(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.execute(
            "INSERT INTO feedback (id, member_id, fitness_class_id, rating, comment)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                self.id,
                self.member.as_ref().map(|m| m.id),
                self.fitness_class.as_ref().map(|c| c.id),
                self.rating,
                self.comment,
            ],
        )
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.execute(
            "UPDATE feedback SET member_id = ?2, fitness_class_id = ?3, rating = ?4, comment = ?5
             WHERE id = ?1",
            params![
                self.id,
                self.member.as_ref().map(|m| m.id),
                self.fitness_class.as_ref().map(|c| c.id),
                self.rating,
                self.comment,
            ],
        )
    }

    fn fetch(resolver: &mut Resolver<'_>, id: EntityId) -> Result<Option<Self>, RepositoryError> {
        let row = resolver
            .conn()
            .query_row(
                "SELECT id, member_id, fitness_class_id, rating, comment FROM feedback WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        Feedback {
                            id: row.get(0)?,
                            member: None,
                            fitness_class: None,
                            rating: row.get(3)?,
                            comment: row.get(4)?,
                        },
                        row.get::<_, Option<EntityId>>(1)?,
                        row.get::<_, Option<EntityId>>(2)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((mut feedback, member_id, class_id)) => {
                feedback.member = resolver.reference::<Member>(member_id)?;
                feedback.fitness_class = resolver
                    .reference::<FitnessClass>(class_id)?
                    .map(Box::new);
                Ok(Some(feedback))
            }
            None => Ok(None),
        }
    }
}
