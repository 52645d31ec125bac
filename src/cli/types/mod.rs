//! Type-safe wrappers for pool identifiers and week numbers.

pub mod ids;
pub mod time;

pub use ids::{EntryId, GameId, TeamId, UserId};
pub use time::Week;
