use rusqlite::{params, Connection, OptionalExtension};

use super::{Resolver, SqlEntity};
use crate::model::{EntityId, Membership};
use crate::storage::error::RepositoryError;

impl SqlEntity for Membership {
    const TABLE: &'static str = "memberships";

    fn insert(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.execute(
            "INSERT INTO memberships (id, membership_type, price) VALUES (?1, ?2, ?3)",
            params![self.id, self.membership_type, self.price],
        )
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.execute(
            "UPDATE memberships SET membership_type = ?2, price = ?3 WHERE id = ?1",
            params![self.id, self.membership_type, self.price],
        )
    }

    fn fetch(resolver: &mut Resolver<'_>, id: EntityId) -> Result<Option<Self>, RepositoryError> {
        let membership = resolver
            .conn()
            .query_row(
                "SELECT id, membership_type, price FROM memberships WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Membership {
                        id: row.get(0)?,
                        membership_type: row.get(1)?,
                        price: row.get(2)?,
                        member_ids: Vec::new(),
                    })
                },
            )
            .optional()?;

        match membership {
            Some(mut membership) => {
                membership.member_ids =
                    resolver.ids("SELECT id FROM members WHERE membership_id = ?1 ORDER BY id", id)?;
                Ok(Some(membership))
            }
            None => Ok(None),
        }
    }
}
