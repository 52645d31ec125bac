//! Storage layer for the survivor pool
//!
//! This module provides a clean abstraction over the SQLite database,
//! organized into logical components:
//! - `models`: Data structures
//! - `schema`: Database connection and schema management
//! - `entries`: Entry registry operations
//! - `picks`: Pick ledger operations
//! - `games`: Game record store operations
//! - `users`: User directory

pub mod entries;
pub mod games;
pub mod models;
pub mod picks;
pub mod schema;
pub mod users;


// Re-export the main types and database struct for easy access
pub use games::ScheduledGame;
pub use models::*;
pub use schema::PoolDatabase;
pub use users::UserDirectory;
