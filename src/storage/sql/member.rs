use rusqlite::{params, Connection, OptionalExtension};

use super::{delete_member_links, format_date, parse_date, Resolver, SqlEntity};
use crate::model::{EntityId, Member, Membership};
use crate::storage::error::RepositoryError;

struct MemberRow {
    id: EntityId,
    name: String,
    mail: String,
    phone: String,
    registration_date: String,
    membership_id: Option<EntityId>,
}

impl SqlEntity for Member {
    const TABLE: &'static str = "members";

    fn insert(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.execute(
            "INSERT INTO members (id, name, mail, phone, registration_date, membership_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                self.id,
                self.name,
                self.mail,
                self.phone,
                format_date(&self.registration_date),
                self.membership.as_ref().map(|m| m.id),
            ],
        )
    }

    fn update(&self, conn: &Connection) -> rusqlite::Result<usize> {
        conn.execute(
            "UPDATE members SET name = ?2, mail = ?3, phone = ?4, registration_date = ?5,
             membership_id = ?6 WHERE id = ?1",
            params![
                self.id,
                self.name,
                self.mail,
                self.phone,
                format_date(&self.registration_date),
                self.membership.as_ref().map(|m| m.id),
            ],
        )
    }

    fn fetch(resolver: &mut Resolver<'_>, id: EntityId) -> Result<Option<Self>, RepositoryError> {
        let row = resolver
            .conn()
            .query_row(
                "SELECT id, name, mail, phone, registration_date, membership_id
                 FROM members WHERE id = ?1",
                params![id],
                |row| {
                    Ok(MemberRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        mail: row.get(2)?,
                        phone: row.get(3)?,
                        registration_date: row.get(4)?,
                        membership_id: row.get(5)?,
                    })
                },
            )
            .optional()?;

        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        let membership = resolver.reference::<Membership>(row.membership_id)?;
        let class_ids = resolver.ids(
            "SELECT fitness_class_id FROM class_members
             WHERE member_id = ?1 ORDER BY fitness_class_id",
            row.id,
        )?;

        Ok(Some(Member {
            id: row.id,
            name: row.name,
            mail: row.mail,
            phone: row.phone,
            registration_date: parse_date(&row.registration_date, "registration_date")?,
            membership,
            class_ids,
        }))
    }

    fn delete_links(conn: &Connection, id: EntityId) -> rusqlite::Result<()> {
        delete_member_links(conn, id)
    }
}
