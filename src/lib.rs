//! Survivor Pool Core Library
//!
//! Tracks entries in a weekly elimination pool: each entry picks one team
//! per week to win; a losing team, a repeated winner, or no pick at all
//! eliminates the entry, and a dead entry may re-enter through a buyback.
//!
//! ## Components
//!
//! - **Team Directory**: static team id lookup (`teams`)
//! - **Storage**: entries, picks, games and users in SQLite (`storage`)
//! - **Lifecycle**: closing, result propagation, reconciliation and
//!   buyback — the rules with the actual invariants (`lifecycle`)
//! - **Tasks**: deferred at-least-once background work (`tasks`)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use survivor_pool::{lifecycle, storage::PoolDatabase, Result, Week};
//!
//! # fn example() -> Result<()> {
//! let mut db = PoolDatabase::new()?;
//!
//! // The whole week's deadline passed: lock every open pick.
//! let closed = lifecycle::close_picks(&mut db, Week::new(3), None)?;
//! println!("closed {closed} picks");
//!
//! // Apply the week's game results to picks and entries.
//! let (wins, losses) = lifecycle::set_pick_status(&mut db, Week::new(3), None)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! Override the database location:
//! ```bash
//! export SURVIVOR_POOL_DB=/var/lib/pool/pool.db
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod lifecycle;
pub mod notify;
pub mod storage;
pub mod tasks;
pub mod teams;

// Re-export commonly used types
pub use cli::types::{EntryId, GameId, TeamId, UserId, Week};
pub use error::{PoolError, Result};
pub use storage::{Entry, Game, Pick, PickCursor, PickStatus, PoolDatabase};
