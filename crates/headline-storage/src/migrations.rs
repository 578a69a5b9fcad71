//! Database schema migrations.

use rusqlite::Connection;
use tracing::info;

use headline_core::error::HeadlineError;

/// Run all pending database migrations.
pub fn run_migrations(conn: &Connection) -> Result<(), HeadlineError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| HeadlineError::Storage(format!("Failed to create migrations table: {}", e)))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| HeadlineError::Storage(format!("Failed to query migration version: {}", e)))?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: delivered_state");
    }

    Ok(())
}

/// Version 1: one row per record id; `urls` holds a JSON array.
fn apply_v1(conn: &Connection) -> Result<(), HeadlineError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS delivered_state (
            record_id   TEXT PRIMARY KEY NOT NULL,
            urls        TEXT NOT NULL DEFAULT '[]',
            timestamp   INTEGER NOT NULL,
            updated_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );

        INSERT OR IGNORE INTO schema_migrations (version, name) VALUES (1, 'delivered_state');
        ",
    )
    .map_err(|e| HeadlineError::Storage(format!("Failed to apply migration v1: {}", e)))?;

    Ok(())
}
