//! Entry registry queries

use super::{models::Entry, schema::PoolDatabase};
use crate::cli::types::{EntryId, UserId};
use crate::error::{PoolError, Result};
use rusqlite::{params, Row};

impl PoolDatabase {
    /// Register a new pool slot for a user: unnamed, alive.
    pub fn create_entry(&mut self, user_id: UserId) -> Result<Entry> {
        self.conn.execute(
            "INSERT INTO entries (user_id, name, alive) VALUES (?, NULL, 1)",
            params![user_id.as_i64()],
        )?;
        let entry_id = EntryId::new(self.conn.last_insert_rowid());
        Ok(Entry {
            entry_id,
            user_id,
            name: None,
            alive: true,
        })
    }

    /// Fetch a single entry.
    pub fn entry(&self, entry_id: EntryId) -> Result<Entry> {
        let mut stmt = self.conn.prepare(
            "SELECT entry_id, user_id, name, alive FROM entries WHERE entry_id = ?",
        )?;
        let result = stmt.query_row(params![entry_id.as_i64()], row_to_entry);
        match result {
            Ok(entry) => Ok(entry),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(PoolError::EntryNotFound(entry_id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Set an entry's display name.
    ///
    /// Renaming is idempotent at this layer; pool-wide name uniqueness is
    /// enforced by the lifecycle code before calling here.
    pub fn set_entry_name(&mut self, entry_id: EntryId, name: &str) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE entries SET name = ? WHERE entry_id = ?",
            params![name, entry_id.as_i64()],
        )?;
        if changed == 0 {
            return Err(PoolError::EntryNotFound(entry_id));
        }
        Ok(())
    }

    /// Flip an entry's alive flag. Used only by the closing, propagation
    /// and buyback processes, never directly by users.
    pub fn set_alive(&mut self, entry_id: EntryId, alive: bool) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE entries SET alive = ? WHERE entry_id = ?",
            params![alive, entry_id.as_i64()],
        )?;
        if changed == 0 {
            return Err(PoolError::EntryNotFound(entry_id));
        }
        Ok(())
    }

    /// Persist a batch of changed entries in one transaction.
    pub fn write_entries(&mut self, entries: &[Entry]) -> Result<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "UPDATE entries SET user_id = ?, name = ?, alive = ? WHERE entry_id = ?",
            )?;
            for entry in entries {
                stmt.execute(params![
                    entry.user_id.as_i64(),
                    entry.name,
                    entry.alive,
                    entry.entry_id.as_i64()
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// All entries owned by a user, in creation order.
    pub fn entries_for_user(&self, user_id: UserId) -> Result<Vec<Entry>> {
        let mut stmt = self.conn.prepare(
            "SELECT entry_id, user_id, name, alive FROM entries
             WHERE user_id = ? ORDER BY entry_id",
        )?;
        let rows = stmt.query_map(params![user_id.as_i64()], row_to_entry)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    /// All currently-alive entries.
    pub fn alive_entries(&self) -> Result<Vec<Entry>> {
        let mut stmt = self.conn.prepare(
            "SELECT entry_id, user_id, name, alive FROM entries
             WHERE alive = 1 ORDER BY entry_id",
        )?;
        let rows = stmt.query_map([], row_to_entry)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    /// Count of a user's entries that are alive but never named.
    pub fn unnamed_alive_count(&self, user_id: UserId) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM entries
             WHERE user_id = ? AND name IS NULL AND alive = 1",
            params![user_id.as_i64()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Whether any entry already uses this display name (pool-wide).
    pub fn entry_name_exists(&self, name: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM entries WHERE name = ?",
            params![name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Next suffix for a generated entry name, unique per user.
    ///
    /// The counter is seeded from the user's already-named entries on first
    /// use and then only ever increments, so re-running the auto-naming
    /// task never re-issues a suffix.
    pub fn next_name_seq(&mut self, user_id: UserId) -> Result<i64> {
        let seq: i64 = self.conn.query_row(
            "INSERT INTO name_seq (user_id, next_seq)
             VALUES (?1, (SELECT COUNT(*) FROM entries
                          WHERE user_id = ?1 AND name IS NOT NULL) + 1)
             ON CONFLICT(user_id) DO UPDATE SET next_seq = next_seq + 1
             RETURNING next_seq",
            params![user_id.as_i64()],
            |row| row.get(0),
        )?;
        Ok(seq)
    }
}

pub(crate) fn row_to_entry(row: &Row) -> rusqlite::Result<Entry> {
    Ok(Entry {
        entry_id: EntryId::new(row.get(0)?),
        user_id: UserId::new(row.get(1)?),
        name: row.get(2)?,
        alive: row.get(3)?,
    })
}
