use crate::errors::AppResult;
use crate::models::user::User;
use rusqlite::{Connection, OptionalExtension, params};

/// Username-keyed access to the users table. The only writer is the
/// first-boot admin bootstrap; no route creates or deletes users.
pub struct UserRepository<'c> {
    conn: &'c Connection,
}

impl<'c> UserRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn count(&self) -> AppResult<i64> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(n)
    }

    pub fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT username, password FROM users WHERE username = ?1",
                [username],
                |row| {
                    Ok(User {
                        username: row.get(0)?,
                        password: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    /// Insert a user with an already-hashed password.
    pub fn create(&self, username: &str, password_hash: &str) -> AppResult<()> {
        self.conn.execute(
            "INSERT INTO users (username, password) VALUES (?1, ?2)",
            params![username, password_hash],
        )?;
        Ok(())
    }
}
