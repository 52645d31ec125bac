//! Dead-entry reconciliation

use crate::cli::types::{EntryId, Week};
use crate::error::Result;
use crate::storage::{Entry, PickStatus, PoolDatabase};
use crate::tasks::{Task, TaskQueue};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Deactivate alive entries that have no pick for the week.
///
/// Such an entry was never named or carried forward; it is deactivated in
/// one batch and its auto-naming is deferred per owning user, because
/// naming must not block the closing path and may be retried. Entries
/// whose pick won, or is flagged buyback, make up the returned surviving
/// alive set.
pub fn deactivate_dead_entries(
    db: &mut PoolDatabase,
    queue: &TaskQueue,
    week: Week,
) -> Result<Vec<Entry>> {
    let picks = db.picks_for_week(week)?;

    let mut orphans: BTreeMap<_, Vec<EntryId>> = BTreeMap::new();
    let mut entries_to_save = Vec::new();
    let mut alive_entries = Vec::new();
    for mut entry in db.alive_entries()? {
        match picks.get(&entry.entry_id) {
            None => {
                orphans.entry(entry.user_id).or_default().push(entry.entry_id);
                entry.alive = false;
                entries_to_save.push(entry);
            }
            Some(pick) if pick.status == PickStatus::Win || pick.buyback => {
                alive_entries.push(entry);
            }
            Some(_) => {}
        }
    }
    db.write_entries(&entries_to_save)?;

    for (user_id, entry_ids) in orphans {
        info!(
            user_id = user_id.as_i64(),
            count = entry_ids.len(),
            "deferring auto-name of orphaned entries"
        );
        queue.enqueue(Task::NameUnnamedEntries {
            user_id,
            entry_ids,
            week,
        })?;
    }

    Ok(alive_entries)
}

/// Deferred handler: give each orphaned entry a generated name and a
/// violation pick for the week.
///
/// Names are `"<username> #<n>"` with `n` drawn from the per-user sequence
/// counter. Re-running is safe: an entry that already got a name keeps it
/// and only has its violation pick ensured, the counter never re-issues a
/// suffix, so a retry after a partial failure converges on the same end
/// state. A single entry's failure is logged and does not abort the rest
/// of the batch; the first hard error is returned at the end so the task
/// gets retried.
pub fn name_unnamed_entries(
    db: &mut PoolDatabase,
    display_name: &str,
    entry_ids: &[EntryId],
    week: Week,
) -> Result<()> {
    let mut first_err = None;
    for &entry_id in entry_ids {
        match name_one_entry(db, display_name, entry_id, week) {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                warn!(entry_id = entry_id.as_i64(), "orphaned entry vanished");
            }
            Err(e) => {
                warn!(
                    entry_id = entry_id.as_i64(),
                    error = %e,
                    "auto-naming failed"
                );
                first_err.get_or_insert(e);
            }
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn name_one_entry(
    db: &mut PoolDatabase,
    display_name: &str,
    entry_id: EntryId,
    week: Week,
) -> Result<()> {
    let entry = db.entry(entry_id)?;

    // An entry that already carries a name is a resumed run; keep the
    // name and only make sure the violation pick landed.
    let name = match entry.name {
        Some(ref name) => name.clone(),
        None => {
            let mut name = format!("{} #{}", display_name, db.next_name_seq(entry.user_id)?);
            while db.entry_name_exists(&name)? {
                name = format!("{} #{}", display_name, db.next_name_seq(entry.user_id)?);
            }
            name
        }
    };

    let mut pick = super::name_entry(db, entry_id, &name, week)?;
    if pick.status != PickStatus::Violation {
        pick.status = PickStatus::Violation;
        db.write_picks(std::slice::from_ref(&pick))?;
        info!(
            entry_id = entry_id.as_i64(),
            name = %name,
            week = week.as_u16(),
            "auto-named orphaned entry"
        );
    }
    Ok(())
}
