use crate::errors::{AppError, AppResult};
use rusqlite::Connection;

/// Current schema version, tracked via PRAGMA user_version.
const SCHEMA_VERSION: i64 = 1;

/// Bring the database up to the current schema. Safe to call on every
/// startup: already-migrated databases are a no-op.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if version > SCHEMA_VERSION {
        return Err(AppError::Migration(format!(
            "database schema version {} is newer than supported {}",
            version, SCHEMA_VERSION
        )));
    }

    if version < 1 {
        create_base_schema(conn)?;
    }

    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    Ok(())
}

/// v1: nights, places, users.
/// The UNIQUE constraint on nights.day enforces at most one night per date.
fn create_base_schema(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS places (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            name      TEXT NOT NULL,
            latitude  REAL,
            longitude REAL
        );

        CREATE TABLE IF NOT EXISTS nights (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            day       TEXT NOT NULL UNIQUE,
            to_bed    TEXT NOT NULL,
            to_rise   TEXT NOT NULL,
            amount    REAL NOT NULL DEFAULT 0,
            place     INTEGER REFERENCES places(id),
            alone     INTEGER NOT NULL DEFAULT 0,
            sleepless INTEGER NOT NULL DEFAULT 0
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_nights_day ON nights(day);

        CREATE TABLE IF NOT EXISTS users (
            username TEXT PRIMARY KEY,
            password TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Run PRAGMA integrity_check and report the result.
pub fn check_integrity(conn: &Connection) -> AppResult<String> {
    let verdict: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
    Ok(verdict)
}
