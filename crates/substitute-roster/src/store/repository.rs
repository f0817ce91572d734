use super::entity::Entity;
use super::error::{is_unique_violation, StoreError};
use crate::clock::Clock;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::marker::PhantomData;
use tracing::{debug, info, warn};

/// CRUD access to one table of the store.
pub struct Repository<'a, E> {
    conn: &'a Connection,
    clock: &'a dyn Clock,
    _entity: PhantomData<E>,
}

impl<'a, E: Entity> Repository<'a, E> {
    pub(super) fn new(conn: &'a Connection, clock: &'a dyn Clock) -> Self {
        Self {
            conn,
            clock,
            _entity: PhantomData,
        }
    }

    /// Persists a new record and returns the id assigned by the store.
    ///
    /// Any id already present on `entity` is ignored.
    pub fn insert(&self, entity: &E) -> Result<i64, StoreError> {
        let placeholders = (1..=E::INSERT_COLUMNS.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders})",
            E::TABLE,
            E::INSERT_COLUMNS.join(", ")
        );

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(&sql, params_from_iter(entity.insert_values(self.clock.now())))
            .map_err(map_write_conflict::<E>)?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        info!(entity = E::KIND, id, "record inserted");
        Ok(id)
    }

    /// All records in insertion order.
    pub fn list(&self) -> Result<Vec<E>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT * FROM {} ORDER BY id ASC", E::TABLE))?;
        let records = stmt
            .query_map([], |row| E::from_row(row))?
            .collect::<Result<Vec<_>, _>>()?;

        debug!(entity = E::KIND, count = records.len(), "records listed");
        Ok(records)
    }

    pub fn get(&self, id: i64) -> Result<Option<E>, StoreError> {
        let record = self
            .conn
            .query_row(
                &format!("SELECT * FROM {} WHERE id = ?1", E::TABLE),
                params![id],
                |row| E::from_row(row),
            )
            .optional()?;
        Ok(record)
    }

    /// Overwrites every mutable column of the record with `entity.id()`.
    ///
    /// Returns `false` when no record has that id; nothing is written then.
    pub fn update(&self, entity: &E) -> Result<bool, StoreError> {
        let id = entity
            .id()
            .ok_or(StoreError::InvalidInput("update requires a record id"))?;

        let assignments = E::UPDATE_COLUMNS
            .iter()
            .enumerate()
            .map(|(index, column)| format!("{column} = ?{}", index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {assignments} WHERE id = ?{}",
            E::TABLE,
            E::UPDATE_COLUMNS.len() + 1
        );

        let mut values = entity.update_values();
        values.push(id.into());

        let tx = self.conn.unchecked_transaction()?;
        let changed = tx
            .execute(&sql, params_from_iter(values))
            .map_err(map_write_conflict::<E>)?;
        tx.commit()?;

        if changed == 0 {
            warn!(entity = E::KIND, id, "update skipped: no record with this id");
            return Ok(false);
        }
        info!(entity = E::KIND, id, "record updated");
        Ok(true)
    }

    /// Removes the record without touching rows that reference it.
    pub fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = tx.execute(
            &format!("DELETE FROM {} WHERE id = ?1", E::TABLE),
            params![id],
        )?;
        tx.commit()?;

        info!(entity = E::KIND, id, removed, "record deleted");
        Ok(removed > 0)
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", E::TABLE),
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

fn map_write_conflict<E: Entity>(err: rusqlite::Error) -> StoreError {
    match E::UNIQUE_FIELD {
        Some(field) if is_unique_violation(&err) => StoreError::UniquenessViolation {
            entity: E::KIND,
            field,
        },
        _ => StoreError::Sql(err),
    }
}
