//! Command implementations for the survivor pool CLI

pub mod entries;
pub mod games;
pub mod standings;
pub mod weekly;

#[cfg(test)]
mod tests;

use crate::cli::types::Week;
use crate::storage::PoolDatabase;

/// Open the pool database for a command handler.
pub fn open_db() -> anyhow::Result<PoolDatabase> {
    Ok(PoolDatabase::new()?)
}

/// Resolve an optional `--week` argument: an explicit week wins, otherwise
/// the week currently in play per the schedule.
pub(crate) fn resolve_week(db: &PoolDatabase, week: Option<Week>) -> crate::error::Result<Week> {
    match week {
        Some(week) => Ok(week),
        None => db.current_week(chrono::Utc::now()),
    }
}
