//! Error types for the survivor pool core

use crate::cli::types::{EntryId, GameId, UserId, Week};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PoolError>;

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse id: {0}")]
    InvalidId(#[from] std::num::ParseIntError),

    #[error("Unknown team: {name}")]
    UnknownTeam { name: String },

    #[error("Entry {0} not found")]
    EntryNotFound(EntryId),

    #[error("No pick for entry {entry_id} in week {week}")]
    PickNotFound { entry_id: EntryId, week: Week },

    #[error("Game {0} not found")]
    GameNotFound(GameId),

    #[error("User {0} not found")]
    UserNotFound(UserId),

    #[error("Pick for entry {entry_id} in week {week} is closed")]
    PickLocked { entry_id: EntryId, week: Week },

    #[error("Pick for entry {entry_id} in week {week} already exists")]
    DuplicatePick { entry_id: EntryId, week: Week },

    #[error("Entry name already in use: {name}")]
    DuplicateEntryName { name: String },

    #[error("Cannot resolve violation pick for entry {entry_id} in week {week}")]
    InconsistentState { entry_id: EntryId, week: Week },

    #[error("No games scheduled")]
    EmptySchedule,

    #[error("Deferred task queue is closed")]
    QueueClosed,

    #[error("Invalid kickoff time: {0}")]
    InvalidKickoff(#[from] chrono::ParseError),
}

impl PoolError {
    /// True for lookup misses that batch operations isolate and log
    /// instead of aborting the whole batch.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PoolError::EntryNotFound(_)
                | PoolError::PickNotFound { .. }
                | PoolError::GameNotFound(_)
                | PoolError::UserNotFound(_)
        )
    }
}

/// Map a SQLite primary-key clash on the picks table to `DuplicatePick`.
pub(crate) fn pick_insert_error(err: rusqlite::Error, entry_id: EntryId, week: Week) -> PoolError {
    match err {
        rusqlite::Error::SqliteFailure(f, _)
            if f.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            PoolError::DuplicatePick { entry_id, week }
        }
        other => PoolError::Db(other),
    }
}
