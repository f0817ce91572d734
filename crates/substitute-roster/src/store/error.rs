use rusqlite::ErrorCode;
use std::path::PathBuf;

/// Failures surfaced by the persistence store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} with this {field} already exists")]
    UniquenessViolation {
        entity: &'static str,
        field: &'static str,
    },
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("storage unavailable at {}: {reason}", path.display())]
    StorageUnavailable { path: PathBuf, reason: String },
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
}

/// Only UNIQUE failures; NOT NULL and foreign key failures stay `Sql`.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(code, _)
            if code.code == ErrorCode::ConstraintViolation
                && code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

pub(crate) fn is_unavailable(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(code, _)
            if matches!(
                code.code,
                ErrorCode::CannotOpen
                    | ErrorCode::PermissionDenied
                    | ErrorCode::ReadOnly
                    | ErrorCode::NotADatabase
                    | ErrorCode::SystemIoFailure
            )
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn only_unique_failures_count_as_duplicates() {
        let conn = Connection::open_in_memory().expect("open in-memory db");
        conn.execute_batch("CREATE TABLE pessoas (nome TEXT NOT NULL, cpf TEXT UNIQUE);")
            .expect("create table");
        conn.execute("INSERT INTO pessoas VALUES ('Ana', '1')", [])
            .expect("first row");

        let duplicate = conn
            .execute("INSERT INTO pessoas VALUES ('Bia', '1')", [])
            .expect_err("duplicate cpf");
        assert!(is_unique_violation(&duplicate));

        let missing_name = conn
            .execute("INSERT INTO pessoas VALUES (NULL, '2')", [])
            .expect_err("null name");
        assert!(!is_unique_violation(&missing_name));
    }
}
