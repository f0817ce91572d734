mod entity;
mod error;
mod repository;
mod schema;

pub use entity::Entity;
pub use error::StoreError;
pub use repository::Repository;

use crate::clock::{Clock, SystemClock};
use crate::domain::{Institution, Professor, Vacancy};
use rusqlite::Connection;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// SQLite-backed store for professors, institutions and vacancies.
///
/// Holds one connection for its lifetime; every repository call runs in its
/// own transaction and nothing spans calls.
pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
    clock: Box<dyn Clock>,
}

impl Database {
    /// Opens (or creates) the store file and ensures the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let unavailable = |reason: String| StoreError::StorageUnavailable {
            path: path.clone(),
            reason,
        };

        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| unavailable(err.to_string()))?;
        }

        let conn = Connection::open(&path).map_err(|err| classify(err, &path))?;
        schema::install_schema(&conn).map_err(|err| match err {
            StoreError::Sql(err) => classify(err, &path),
            other => other,
        })?;

        debug!(path = %path.display(), "store opened");
        Ok(Self {
            conn,
            path: Some(path),
            clock: Box::new(SystemClock),
        })
    }

    /// Private store that lives as long as the returned value.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        schema::install_schema(&conn)?;
        Ok(Self {
            conn,
            path: None,
            clock: Box::new(SystemClock),
        })
    }

    /// Replaces the clock used for creation stamps.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn repository<E: Entity>(&self) -> Repository<'_, E> {
        Repository::new(&self.conn, self.clock.as_ref())
    }

    pub fn professors(&self) -> Repository<'_, Professor> {
        self.repository()
    }

    pub fn institutions(&self) -> Repository<'_, Institution> {
        self.repository()
    }

    pub fn vacancies(&self) -> Repository<'_, Vacancy> {
        self.repository()
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

fn classify(err: rusqlite::Error, path: &Path) -> StoreError {
    if error::is_unavailable(&err) {
        StoreError::StorageUnavailable {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    } else {
        StoreError::Sql(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("data").join("roster.db");

        let db = Database::open(&path).expect("store opens");
        assert_eq!(db.path(), Some(path.as_path()));
        assert!(path.exists());
    }

    #[test]
    fn reopening_keeps_existing_records() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("roster.db");

        {
            let db = Database::open(&path).expect("first open");
            db.professors()
                .insert(&Professor::new("Ana Silva", "11122233344"))
                .expect("insert");
        }

        let db = Database::open(&path).expect("second open");
        let professors = db.professors().list().expect("list");
        assert_eq!(professors.len(), 1);
        assert_eq!(professors[0].name, "Ana Silva");
    }

    #[test]
    fn directory_in_place_of_file_is_unavailable() {
        let dir = tempfile::tempdir().expect("temp dir");

        let err = Database::open(dir.path()).expect_err("a directory is not a store file");
        assert!(matches!(err, StoreError::StorageUnavailable { .. }));
    }
}
