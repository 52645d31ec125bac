//! Buyback reactivation

use crate::cli::types::{EntryId, UserId};
use crate::error::Result;
use crate::storage::PoolDatabase;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// Reactivate a dead entry.
///
/// The entry is always set alive. Before the current week's deadline the
/// entry simply continues playing: its existing pick for this week is
/// flagged as the buyback. After the deadline, last week's pick carries
/// the flag instead and a fresh pick is created for the current week; the
/// owning user is returned so the caller can send a confirmation email.
///
/// A missing qualifying pick is a recoverable condition: it is logged and
/// `None` is returned, with no flag set and no pick created.
pub fn buyback_entry(
    db: &mut PoolDatabase,
    entry_id: EntryId,
    now: DateTime<Utc>,
) -> Result<Option<UserId>> {
    let week = db.current_week(now)?;
    let mut entry = db.entry(entry_id)?;
    entry.alive = true;
    db.set_alive(entry_id, true)?;

    let before_deadline = !db.deadline_passed(week, now)?;
    let target_week = if before_deadline { Some(week) } else { week.prev() };

    let target = match target_week {
        Some(w) => db.pick_for_entry(entry_id, w)?.map(|p| p.week),
        None => None,
    };
    let target = match target {
        Some(w) => w,
        None => {
            warn!(
                entry_id = entry_id.as_i64(),
                week = week.as_u16(),
                "no buyback target pick found"
            );
            return Ok(None);
        }
    };

    db.set_buyback(target, entry_id)?;

    if before_deadline {
        info!(
            entry_id = entry_id.as_i64(),
            week = week.as_u16(),
            "buyback before deadline, entry continues this week"
        );
        return Ok(None);
    }

    // Deadline already passed: the entry needs a pick to play this week,
    // and the owner gets an email about it.
    if db.pick_for_entry(entry_id, week)?.is_none() {
        db.create_pick(&entry, week)?;
    }
    info!(
        entry_id = entry_id.as_i64(),
        week = week.as_u16(),
        "buyback after deadline, created fresh pick"
    );
    Ok(Some(entry.user_id))
}
