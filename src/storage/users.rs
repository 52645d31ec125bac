//! User directory queries
//!
//! The pool core only ever needs a user's display name (for generated entry
//! names); that narrow lookup is the `UserDirectory` trait. The bundled
//! implementation is a plain table in the same database, but the lifecycle
//! code never assumes more than the trait.

use super::{models::User, schema::PoolDatabase};
use crate::cli::types::UserId;
use crate::error::{PoolError, Result};
use rusqlite::params;

/// Read-only lookup of user display names.
pub trait UserDirectory {
    fn display_name(&self, user_id: UserId) -> Result<String>;
}

impl PoolDatabase {
    /// Register a user.
    pub fn add_user(&mut self, name: &str, email: Option<&str>) -> Result<User> {
        self.conn.execute(
            "INSERT INTO users (name, email) VALUES (?, ?)",
            params![name, email],
        )?;
        Ok(User {
            user_id: UserId::new(self.conn.last_insert_rowid()),
            name: name.to_string(),
            email: email.map(str::to_string),
        })
    }

    /// Fetch a single user.
    pub fn user(&self, user_id: UserId) -> Result<User> {
        let mut stmt = self
            .conn
            .prepare("SELECT user_id, name, email FROM users WHERE user_id = ?")?;
        let result = stmt.query_row(params![user_id.as_i64()], |row| {
            Ok(User {
                user_id: UserId::new(row.get(0)?),
                name: row.get(1)?,
                email: row.get(2)?,
            })
        });
        match result {
            Ok(user) => Ok(user),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(PoolError::UserNotFound(user_id)),
            Err(e) => Err(e.into()),
        }
    }
}

impl UserDirectory for PoolDatabase {
    fn display_name(&self, user_id: UserId) -> Result<String> {
        Ok(self.user(user_id)?.name)
    }
}
