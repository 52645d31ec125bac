//! Pick/entry lifecycle
//!
//! The rules that turn weekly game results into entry survival: closing
//! picks at the deadline, propagating wins and losses, reconciling entries
//! that never picked, and buyback reactivation. Every batch operation here
//! is a sequential scan whose status transitions are query-filtered, so
//! re-running after a partial failure converges instead of corrupting
//! state.

pub mod buyback;
pub mod closing;
pub mod propagation;
pub mod reconcile;

#[cfg(test)]
mod tests;

pub use buyback::buyback_entry;
pub use closing::close_picks;
pub use propagation::set_pick_status;
pub use reconcile::deactivate_dead_entries;

use crate::cli::types::{EntryId, Week};
use crate::error::{PoolError, Result};
use crate::storage::{Pick, PoolDatabase};

/// Name an entry and make sure it has a pick for `week`.
///
/// Naming is how an entry is activated; the first call also creates its
/// first pick. Renaming is idempotent (re-sending the same name is a
/// no-op), but a name already used by another entry is rejected pool-wide.
pub fn name_entry(
    db: &mut PoolDatabase,
    entry_id: EntryId,
    name: &str,
    week: Week,
) -> Result<Pick> {
    let mut entry = db.entry(entry_id)?;
    if entry.name.as_deref() != Some(name) && db.entry_name_exists(name)? {
        return Err(PoolError::DuplicateEntryName {
            name: name.to_string(),
        });
    }
    db.set_entry_name(entry_id, name)?;
    entry.name = Some(name.to_string());

    match db.pick_for_entry(entry_id, week)? {
        Some(pick) => Ok(pick),
        None => db.create_pick(&entry, week),
    }
}

/// Create the week's picks for a set of entries, skipping entries that
/// already have one. Run by an admin once the surviving alive set for the
/// new week is known.
pub fn create_picks(
    db: &mut PoolDatabase,
    week: Week,
    entries: &[crate::storage::Entry],
) -> Result<usize> {
    let mut created = 0;
    for entry in entries {
        if db.pick_for_entry(entry.entry_id, week)?.is_some() {
            continue;
        }
        db.create_pick(entry, week)?;
        created += 1;
    }
    Ok(created)
}
