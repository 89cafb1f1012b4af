//! The set of repositories a gym service runs on.

use std::path::Path;

use crate::model::{
    Equipment, Feedback, FitnessClass, Location, Member, Membership, Reservation, Room, Trainer,
};
use crate::storage::{
    ClassLinks, Database, FileRepository, InMemoryRepository, MemoryClassLinks, Repository,
    RepositoryError, SqlClassLinks, SqlRepository,
};

/// One repository per entity plus the join relation store.
///
/// Fields are public so a single backend can be swapped, e.g. file-backed
/// trainers next to in-memory classes.
pub struct Repositories<'a> {
    pub trainers: Box<dyn Repository<Trainer> + 'a>,
    pub members: Box<dyn Repository<Member> + 'a>,
    pub classes: Box<dyn Repository<FitnessClass> + 'a>,
    pub rooms: Box<dyn Repository<Room> + 'a>,
    pub locations: Box<dyn Repository<Location> + 'a>,
    pub equipment: Box<dyn Repository<Equipment> + 'a>,
    pub memberships: Box<dyn Repository<Membership> + 'a>,
    pub feedback: Box<dyn Repository<Feedback> + 'a>,
    pub reservations: Box<dyn Repository<Reservation> + 'a>,
    pub links: Box<dyn ClassLinks + 'a>,
}

impl Repositories<'static> {
    /// Volatile stores for every entity.
    pub fn in_memory() -> Self {
        let classes = InMemoryRepository::new();
        let members = InMemoryRepository::new();
        let equipment = InMemoryRepository::new();
        let feedback = InMemoryRepository::new();
        let memberships = InMemoryRepository::new();
        let links = MemoryClassLinks::new(
            classes.clone(),
            members.clone(),
            equipment.clone(),
            feedback.clone(),
            memberships.clone(),
        );

        Self {
            trainers: Box::new(InMemoryRepository::new()),
            members: Box::new(members),
            classes: Box::new(classes),
            rooms: Box::new(InMemoryRepository::new()),
            locations: Box::new(InMemoryRepository::new()),
            equipment: Box::new(equipment),
            memberships: Box::new(memberships),
            feedback: Box::new(feedback),
            reservations: Box::new(InMemoryRepository::new()),
            links: Box::new(links),
        }
    }
}

impl<'a> Repositories<'a> {
    /// Relational stores over one SQLite connection.
    pub fn sqlite(db: &'a Database) -> Self {
        let conn = db.connection();
        Self {
            trainers: Box::new(SqlRepository::<Trainer>::new(conn)),
            members: Box::new(SqlRepository::<Member>::new(conn)),
            classes: Box::new(SqlRepository::<FitnessClass>::new(conn)),
            rooms: Box::new(SqlRepository::<Room>::new(conn)),
            locations: Box::new(SqlRepository::<Location>::new(conn)),
            equipment: Box::new(SqlRepository::<Equipment>::new(conn)),
            memberships: Box::new(SqlRepository::<Membership>::new(conn)),
            feedback: Box::new(SqlRepository::<Feedback>::new(conn)),
            reservations: Box::new(SqlRepository::<Reservation>::new(conn)),
            links: Box::new(SqlClassLinks::new(conn)),
        }
    }

    /// Move trainers and locations to flat files under `dir`.
    pub fn with_file_records(mut self, dir: &Path) -> Result<Self, RepositoryError> {
        self.trainers = Box::new(FileRepository::<Trainer>::open(dir.join("trainers.csv"))?);
        self.locations = Box::new(FileRepository::<Location>::open(dir.join("locations.csv"))?);
        Ok(self)
    }
}
