//! Flat-file backend.
//!
//! One entity per line in the record's declared field order. Reads scan the
//! whole file; `update` and `delete` rebuild the entity list in memory and
//! replace the file through a sibling temp file.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::marker::PhantomData;
use std::path::PathBuf;

use crate::model::EntityId;
use crate::storage::error::RepositoryError;
use crate::storage::record::{decode, encode, FileRecord};
use crate::storage::repository::Repository;

/// Repository persisting scalar-only records to a delimited text file.
#[derive(Debug, Clone)]
pub struct FileRepository<T> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T: FileRecord> FileRepository<T> {
    /// Use the file at `path`, creating its parent directory if needed.
    ///
    /// The file itself is created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self {
            path,
            _record: PhantomData,
        })
    }

    fn load(&self) -> Result<Vec<T>, RepositoryError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(decode::<T>)
            .collect()
    }

    fn rewrite(&self, records: &[T]) -> Result<(), RepositoryError> {
        let mut content = String::new();
        for record in records {
            content.push_str(&encode(record)?);
            content.push('\n');
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl<T: FileRecord> Repository<T> for FileRepository<T> {
    fn create(&self, entity: &T) -> Result<(), RepositoryError> {
        if self.load()?.iter().any(|r| r.id() == entity.id()) {
            return Err(RepositoryError::DuplicateKey {
                kind: T::KIND,
                id: entity.id(),
            });
        }
        let line = encode(entity)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;

        tracing::debug!("Appended {} {} to {}", T::KIND, entity.id(), self.path.display());
        Ok(())
    }

    fn read(&self, id: EntityId) -> Result<Option<T>, RepositoryError> {
        Ok(self.load()?.into_iter().find(|r| r.id() == id))
    }

    fn update(&self, entity: &T) -> Result<(), RepositoryError> {
        let mut records = self.load()?;
        let slot = records
            .iter_mut()
            .find(|r| r.id() == entity.id())
            .ok_or(RepositoryError::NotFound {
                kind: T::KIND,
                id: entity.id(),
            })?;
        // Validate before touching the file so a bad value leaves it intact.
        let line = encode(entity)?;
        *slot = decode(&line)?;

        self.rewrite(&records)?;
        tracing::debug!("Rewrote {} {} in {}", T::KIND, entity.id(), self.path.display());
        Ok(())
    }

    fn delete(&self, id: EntityId) -> Result<(), RepositoryError> {
        let records = self.load()?;
        let before = records.len();
        let remaining: Vec<T> = records.into_iter().filter(|r| r.id() != id).collect();
        if remaining.len() == before {
            return Err(RepositoryError::NotFound { kind: T::KIND, id });
        }

        self.rewrite(&remaining)?;
        tracing::debug!("Removed {} {} from {}", T::KIND, id, self.path.display());
        Ok(())
    }

    fn get_all(&self) -> Result<Vec<T>, RepositoryError> {
        self.load()
    }
}
