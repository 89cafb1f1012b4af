//! Existence-guarded access to one repository.
//!
//! Every mutation probes first: `add` rejects a present id, `update` and
//! `remove` reject a missing one. Probe and write are separate calls, which
//! is sound only while one caller drives the repositories at a time.

use crate::model::{EntityId, Identifiable};
use crate::services::error::ServiceError;
use crate::storage::Repository;

/// Guarded CRUD over a boxed repository.
pub struct Catalog<'a, T: Identifiable> {
    repo: Box<dyn Repository<T> + 'a>,
}

impl<'a, T: Identifiable> Catalog<'a, T> {
    pub fn new(repo: Box<dyn Repository<T> + 'a>) -> Self {
        Self { repo }
    }

    pub fn add(&self, entity: &T) -> Result<(), ServiceError> {
        if self.repo.exists(entity.id())? {
            return Err(ServiceError::AlreadyExists {
                kind: T::KIND,
                id: entity.id(),
            });
        }
        self.repo.create(entity)?;
        Ok(())
    }

    /// Fetch an entity; a missing id is an error.
    pub fn get(&self, id: EntityId) -> Result<T, ServiceError> {
        self.repo
            .read(id)?
            .ok_or(ServiceError::NotFound { kind: T::KIND, id })
    }

    pub fn find(&self, id: EntityId) -> Result<Option<T>, ServiceError> {
        Ok(self.repo.read(id)?)
    }

    pub fn update(&self, entity: &T) -> Result<(), ServiceError> {
        self.require(entity.id())?;
        self.repo.update(entity)?;
        Ok(())
    }

    pub fn remove(&self, id: EntityId) -> Result<(), ServiceError> {
        self.require(id)?;
        self.repo.delete(id)?;
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<T>, ServiceError> {
        Ok(self.repo.get_all()?)
    }

    pub fn contains(&self, id: EntityId) -> Result<bool, ServiceError> {
        Ok(self.repo.exists(id)?)
    }

    fn require(&self, id: EntityId) -> Result<(), ServiceError> {
        if self.repo.exists(id)? {
            Ok(())
        } else {
            Err(ServiceError::NotFound { kind: T::KIND, id })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Location;
    use crate::storage::InMemoryRepository;

    fn catalog() -> Catalog<'static, Location> {
        Catalog::new(Box::new(InMemoryRepository::new()))
    }

    #[test]
    fn test_add_rejects_existing_id() {
        let locations = catalog();
        locations.add(&Location::new(1, "North", "Elm St 5")).unwrap();

        let result = locations.add(&Location::new(1, "South", "Oak St 9"));
        assert!(matches!(result, Err(ServiceError::AlreadyExists { id: 1, .. })));
        assert_eq!(locations.get(1).unwrap().name, "North");
    }

    #[test]
    fn test_get_missing_is_an_error() {
        let locations = catalog();
        assert!(matches!(
            locations.get(3),
            Err(ServiceError::NotFound { id: 3, .. })
        ));
        assert!(locations.find(3).unwrap().is_none());
    }

    #[test]
    fn test_update_and_remove_require_presence() {
        let locations = catalog();
        assert!(matches!(
            locations.update(&Location::new(2, "East", "Pine St 1")),
            Err(ServiceError::NotFound { id: 2, .. })
        ));
        assert!(matches!(
            locations.remove(2),
            Err(ServiceError::NotFound { id: 2, .. })
        ));
        assert!(locations.list().unwrap().is_empty());
    }

    #[test]
    fn test_update_replaces_entity() {
        let locations = catalog();
        locations.add(&Location::new(1, "North", "Elm St 5")).unwrap();
        locations.update(&Location::new(1, "North Hall", "Elm St 7")).unwrap();

        let stored = locations.get(1).unwrap();
        assert_eq!(stored.name, "North Hall");
        assert_eq!(stored.address, "Elm St 7");
    }
}
