//! Relational backend over SQLite.
//!
//! `SqlRepository<T>` honors the repository contract for every entity with a
//! `SqlEntity` mapping. Reads go through a `Resolver`, which rebuilds the
//! entity graph by fetching owned references and join-table collections
//! recursively. The resolver keeps a stack of the entities being loaded: an
//! entity already on the stack, or one past `MAX_RESOLVE_DEPTH`, resolves to
//! nothing. A dangling foreign key also resolves to nothing. Such a reference
//! becomes `None`, and in a collection the entity is left out entirely, so a
//! class loaded from one of its feedback entries lists the others but not
//! that one.

mod equipment;
mod feedback;
mod fitness_class;
mod location;
mod member;
mod membership;
mod reservation;
mod room;
mod trainer;

use std::marker::PhantomData;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::model::{EntityId, EntityKind, Equipment, FitnessClass, Identifiable, Member};
use crate::storage::error::RepositoryError;
use crate::storage::repository::{ClassLinks, Repository};

/// Deepest chain of nested references the resolver follows.
pub const MAX_RESOLVE_DEPTH: usize = 8;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Row mapping of an entity onto its table.
///
/// `insert` and `update` write the entity's own columns plus foreign key
/// ids of owned references; join tables are never written here.
pub trait SqlEntity: Identifiable + Sized {
    const TABLE: &'static str;

    fn insert(&self, conn: &Connection) -> rusqlite::Result<usize>;

    /// Returns the number of rows changed.
    fn update(&self, conn: &Connection) -> rusqlite::Result<usize>;

    /// Load the row and resolve its neighbors.
    fn fetch(resolver: &mut Resolver<'_>, id: EntityId) -> Result<Option<Self>, RepositoryError>;

    /// Remove join rows mentioning the entity.
    fn delete_links(_conn: &Connection, _id: EntityId) -> rusqlite::Result<()> {
        Ok(())
    }
}

/// Recursive graph loader for one read.
pub struct Resolver<'a> {
    conn: &'a Connection,
    visiting: Vec<(EntityKind, EntityId)>,
}

impl<'a> Resolver<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            visiting: Vec::new(),
        }
    }

    pub fn conn(&self) -> &'a Connection {
        self.conn
    }

    /// Load an entity unless it is already being loaded further up.
    pub fn resolve<T: SqlEntity>(&mut self, id: EntityId) -> Result<Option<T>, RepositoryError> {
        let key = (T::KIND, id);
        if self.visiting.contains(&key) {
            tracing::trace!("Cycle back to {} {} cut", T::KIND, id);
            return Ok(None);
        }
        if self.visiting.len() >= MAX_RESOLVE_DEPTH {
            tracing::warn!("Reference to {} {} exceeds resolve depth", T::KIND, id);
            return Ok(None);
        }

        self.visiting.push(key);
        let result = T::fetch(self, id);
        self.visiting.pop();

        if matches!(result, Ok(None)) && !self.visiting.is_empty() {
            tracing::warn!("Dangling reference to {} {}", T::KIND, id);
        }
        result
    }

    /// Resolve an optional foreign key.
    pub fn reference<T: SqlEntity>(
        &mut self,
        id: Option<EntityId>,
    ) -> Result<Option<T>, RepositoryError> {
        match id {
            Some(id) => self.resolve(id),
            None => Ok(None),
        }
    }

    /// Resolve every id returned by `sql`, skipping ids that resolve to nothing.
    pub fn collection<T: SqlEntity>(
        &mut self,
        sql: &str,
        owner_id: EntityId,
    ) -> Result<Vec<T>, RepositoryError> {
        let ids = self.ids(sql, owner_id)?;
        let mut items = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(item) = self.resolve(id)? {
                items.push(item);
            }
        }
        Ok(items)
    }

    /// Run a single-column id query keyed by `owner_id`.
    pub fn ids(&self, sql: &str, owner_id: EntityId) -> Result<Vec<EntityId>, RepositoryError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params![owner_id], |row| row.get::<_, EntityId>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

/// Repository for one entity type over a borrowed connection.
pub struct SqlRepository<'a, T> {
    conn: &'a Connection,
    _entity: PhantomData<fn() -> T>,
}

impl<'a, T: SqlEntity> SqlRepository<'a, T> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }
}

impl<T: SqlEntity> Repository<T> for SqlRepository<'_, T> {
    fn create(&self, entity: &T) -> Result<(), RepositoryError> {
        if self.exists(entity.id())? {
            return Err(RepositoryError::DuplicateKey {
                kind: T::KIND,
                id: entity.id(),
            });
        }
        entity.insert(self.conn)?;
        tracing::debug!("Inserted {} {}", T::KIND, entity.id());
        Ok(())
    }

    fn read(&self, id: EntityId) -> Result<Option<T>, RepositoryError> {
        Resolver::new(self.conn).resolve(id)
    }

    fn update(&self, entity: &T) -> Result<(), RepositoryError> {
        let rows_affected = entity.update(self.conn)?;
        if rows_affected == 0 {
            return Err(RepositoryError::NotFound {
                kind: T::KIND,
                id: entity.id(),
            });
        }
        tracing::debug!("Updated {} {}", T::KIND, entity.id());
        Ok(())
    }

    fn delete(&self, id: EntityId) -> Result<(), RepositoryError> {
        // Primary row and join rows go together; dropping `tx` rolls back.
        let tx = self.conn.unchecked_transaction()?;
        let rows_affected = tx.execute(
            &format!("DELETE FROM {} WHERE id = ?1", T::TABLE),
            params![id],
        )?;
        if rows_affected == 0 {
            return Err(RepositoryError::NotFound { kind: T::KIND, id });
        }
        T::delete_links(&tx, id)?;
        tx.commit()?;

        tracing::debug!("Deleted {} {}", T::KIND, id);
        Ok(())
    }

    fn get_all(&self) -> Result<Vec<T>, RepositoryError> {
        let mut resolver = Resolver::new(self.conn);
        let ids = {
            let mut stmt = self
                .conn
                .prepare(&format!("SELECT id FROM {} ORDER BY id", T::TABLE))?;
            let rows = stmt.query_map([], |row| row.get::<_, EntityId>(0))?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        let mut entities = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(entity) = resolver.resolve(id)? {
                entities.push(entity);
            }
        }
        Ok(entities)
    }

    fn exists(&self, id: EntityId) -> Result<bool, RepositoryError> {
        let found = self
            .conn
            .query_row(
                &format!("SELECT 1 FROM {} WHERE id = ?1", T::TABLE),
                params![id],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

/// Join table maintenance over SQLite.
pub struct SqlClassLinks<'a> {
    conn: &'a Connection,
}

impl<'a> SqlClassLinks<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn require<T: SqlEntity>(&self, id: EntityId) -> Result<(), RepositoryError> {
        if SqlRepository::<T>::new(self.conn).exists(id)? {
            Ok(())
        } else {
            Err(RepositoryError::NotFound { kind: T::KIND, id })
        }
    }
}

impl ClassLinks for SqlClassLinks<'_> {
    fn link_member(&self, class_id: EntityId, member_id: EntityId) -> Result<(), RepositoryError> {
        self.require::<FitnessClass>(class_id)?;
        self.require::<Member>(member_id)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO class_members (fitness_class_id, member_id) VALUES (?1, ?2)",
            params![class_id, member_id],
        )?;
        Ok(())
    }

    fn unlink_member(
        &self,
        class_id: EntityId,
        member_id: EntityId,
    ) -> Result<(), RepositoryError> {
        self.conn.execute(
            "DELETE FROM class_members WHERE fitness_class_id = ?1 AND member_id = ?2",
            params![class_id, member_id],
        )?;
        Ok(())
    }

    fn link_equipment(
        &self,
        class_id: EntityId,
        equipment_id: EntityId,
    ) -> Result<(), RepositoryError> {
        self.require::<FitnessClass>(class_id)?;
        self.require::<Equipment>(equipment_id)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO class_equipment (fitness_class_id, equipment_id) VALUES (?1, ?2)",
            params![class_id, equipment_id],
        )?;
        Ok(())
    }

    fn unlink_equipment(
        &self,
        class_id: EntityId,
        equipment_id: EntityId,
    ) -> Result<(), RepositoryError> {
        self.conn.execute(
            "DELETE FROM class_equipment WHERE fitness_class_id = ?1 AND equipment_id = ?2",
            params![class_id, equipment_id],
        )?;
        Ok(())
    }

    // Feedback and holders are derived from foreign keys on read.

    fn link_feedback(&self, _class_id: EntityId, _feedback_id: EntityId) -> Result<(), RepositoryError> {
        Ok(())
    }

    fn unlink_feedback(
        &self,
        _class_id: EntityId,
        _feedback_id: EntityId,
    ) -> Result<(), RepositoryError> {
        Ok(())
    }

    fn link_holder(&self, _membership_id: EntityId, _member_id: EntityId) -> Result<(), RepositoryError> {
        Ok(())
    }

    fn unlink_holder(
        &self,
        _membership_id: EntityId,
        _member_id: EntityId,
    ) -> Result<(), RepositoryError> {
        Ok(())
    }

    fn purge_class(&self, class_id: EntityId) -> Result<(), RepositoryError> {
        Ok(delete_class_links(self.conn, class_id)?)
    }

    fn purge_member(&self, member_id: EntityId) -> Result<(), RepositoryError> {
        Ok(delete_member_links(self.conn, member_id)?)
    }

    fn purge_equipment(&self, equipment_id: EntityId) -> Result<(), RepositoryError> {
        Ok(delete_equipment_links(self.conn, equipment_id)?)
    }
}

pub(crate) fn delete_class_links(conn: &Connection, class_id: EntityId) -> rusqlite::Result<()> {
    conn.execute(
        "DELETE FROM class_members WHERE fitness_class_id = ?1",
        params![class_id],
    )?;
    conn.execute(
        "DELETE FROM class_equipment WHERE fitness_class_id = ?1",
        params![class_id],
    )?;
    Ok(())
}

pub(crate) fn delete_member_links(conn: &Connection, member_id: EntityId) -> rusqlite::Result<()> {
    conn.execute(
        "DELETE FROM class_members WHERE member_id = ?1",
        params![member_id],
    )?;
    Ok(())
}

pub(crate) fn delete_equipment_links(
    conn: &Connection,
    equipment_id: EntityId,
) -> rusqlite::Result<()> {
    conn.execute(
        "DELETE FROM class_equipment WHERE equipment_id = ?1",
        params![equipment_id],
    )?;
    Ok(())
}

pub(crate) fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339()
}

pub(crate) fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Deserialization(format!("Invalid {} '{}': {}", column, value, e)))
}

pub(crate) fn format_date(value: &NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_date(value: &str, column: &str) -> Result<NaiveDate, RepositoryError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| RepositoryError::Deserialization(format!("Invalid {} '{}': {}", column, value, e)))
}
