//! Database connection management.
//!
//! Wraps a single rusqlite Connection in a Mutex for thread-safe access.
//! Configures WAL mode on file databases and runs migrations on open.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use tracing::info;

use headline_core::error::HeadlineError;

use crate::migrations;

/// Thread-safe SQLite database wrapper.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a database at the given path.
    pub fn new(path: &Path) -> Result<Self, HeadlineError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| HeadlineError::Storage(format!("Failed to open database: {}", e)))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| HeadlineError::Storage(format!("Failed to set pragmas: {}", e)))?;

        info!("Database opened at {}", path.display());
        Self::with_migrations(conn)
    }

    /// Open an in-memory database (for testing).
    pub fn in_memory() -> Result<Self, HeadlineError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| HeadlineError::Storage(format!("Failed to open in-memory db: {}", e)))?;
        Self::with_migrations(conn)
    }

    fn with_migrations(conn: Connection) -> Result<Self, HeadlineError> {
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.with_conn(migrations::run_migrations)?;
        Ok(db)
    }

    /// Execute a closure with a reference to the underlying connection.
    ///
    /// The mutex is held for the duration of the closure.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, HeadlineError>
    where
        F: FnOnce(&Connection) -> Result<T, HeadlineError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| HeadlineError::Storage(format!("Database lock poisoned: {}", e)))?;
        f(&conn)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_rows(db: &Database) -> i64 {
        db.with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM delivered_state", [], |row| row.get(0))
                .map_err(|e| HeadlineError::Storage(e.to_string()))
        })
        .unwrap()
    }

    #[test]
    fn test_in_memory_database() {
        let db = Database::in_memory().unwrap();
        assert_eq!(count_rows(&db), 0);
    }

    #[test]
    fn test_file_database_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("delivered.db");
        let db = Database::new(&path).unwrap();
        assert!(path.exists());
        assert_eq!(count_rows(&db), 0);
    }

    #[test]
    fn test_reopen_keeps_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("delivered.db");
        drop(Database::new(&path).unwrap());
        let db = Database::new(&path).unwrap();
        assert_eq!(count_rows(&db), 0);
    }
}
