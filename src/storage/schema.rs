//! Database schema and connection management

use crate::error::{PoolError, Result};
use dirs::data_dir;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Environment variable overriding the default database location.
pub const DB_PATH_ENV_VAR: &str = "SURVIVOR_POOL_DB";

/// Database connection manager for pool records.
pub struct PoolDatabase {
    pub(crate) conn: Connection,
}

impl PoolDatabase {
    /// Open the default database and ensure tables exist.
    pub fn new() -> Result<Self> {
        Self::open(&Self::database_path()?)
    }

    /// Open a database at an explicit path and ensure tables exist.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let mut db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Open an in-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Resolve the database file path (`SURVIVOR_POOL_DB` or the platform
    /// data directory).
    fn database_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(DB_PATH_ENV_VAR) {
            return Ok(PathBuf::from(path));
        }
        let data_dir = data_dir().ok_or_else(|| {
            PoolError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "could not determine data directory",
            ))
        })?;
        Ok(data_dir.join("survivor-pool").join("pool.db"))
    }

    /// Initialize the database schema
    pub(crate) fn initialize_schema(&mut self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                user_id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS entries (
                entry_id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                name TEXT,
                alive INTEGER NOT NULL DEFAULT 1,
                FOREIGN KEY (user_id) REFERENCES users(user_id)
            )",
            [],
        )?;

        // Composite identity key: at most one pick per entry per week.
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS picks (
                week INTEGER NOT NULL,
                entry_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                team INTEGER,
                closed INTEGER NOT NULL DEFAULT 0,
                buyback INTEGER NOT NULL DEFAULT 0,
                status INTEGER NOT NULL DEFAULT 0,
                modified INTEGER NOT NULL,
                PRIMARY KEY (week, entry_id),
                FOREIGN KEY (entry_id) REFERENCES entries(entry_id)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS games (
                game_id INTEGER PRIMARY KEY,
                week INTEGER NOT NULL,
                home INTEGER NOT NULL,
                visiting INTEGER NOT NULL,
                kickoff INTEGER NOT NULL,
                home_score INTEGER,
                visiting_score INTEGER,
                winner INTEGER
            )",
            [],
        )?;

        // Per-user counter backing generated entry names. Kept explicit so
        // concurrent reconciliation runs never re-derive the same suffix.
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS name_seq (
                user_id INTEGER PRIMARY KEY,
                next_seq INTEGER NOT NULL
            )",
            [],
        )?;

        // Indexes for the scans in storage queries
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_entries_user ON entries(user_id)",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_entries_alive ON entries(alive)",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_picks_user_week ON picks(user_id, week)",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_picks_closed_scan
             ON picks(closed, entry_id, week)",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_games_week ON games(week, kickoff)",
            [],
        )?;

        Ok(())
    }

    /// Current time as unix seconds, the `modified` stamp written on picks.
    pub(crate) fn now_ts() -> i64 {
        chrono::Utc::now().timestamp()
    }
}
