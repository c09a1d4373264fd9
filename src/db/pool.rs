//! SQLite connection wrapper. The server holds one of these behind an
//! async mutex, so every handler sees the database as a single serialized
//! unit; the CLI commands use it directly.

use rusqlite::{Connection, Result};
use std::path::Path;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(Path::new(path))?;
        Ok(Self { conn })
    }
}
