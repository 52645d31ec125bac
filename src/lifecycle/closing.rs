//! Weekly closing process

use crate::cli::types::{TeamId, Week};
use crate::error::Result;
use crate::storage::{PickStatus, PoolDatabase};
use std::collections::HashSet;
use tracing::{info, warn};

/// Lock the week's still-open picks and flag self-eliminating violations.
///
/// With `restrict_to_teams` set, only picks selecting one of those teams
/// are closed (a subset of games just kicked off); without it every open
/// pick for the week is closed (the whole week's deadline passed).
///
/// A closed pick becomes a violation when it re-picks the team the entry
/// won with last week, or — on a full-week close only — when it never
/// selected a team at all. The "never picked" check is deliberately
/// skipped for subset closes: a pick on a team that has not kicked off yet
/// is still editable.
///
/// Changed picks are written first, violating entries deactivated second,
/// each in its own batch; already-closed picks are excluded by the query
/// so a retry closes nothing twice. Returns the number of picks closed.
pub fn close_picks(
    db: &mut PoolDatabase,
    week: Week,
    restrict_to_teams: Option<&HashSet<TeamId>>,
) -> Result<usize> {
    if let Some(teams) = restrict_to_teams {
        if teams.is_empty() {
            info!(week = week.as_u16(), "no teams to close");
            return Ok(0);
        }
        info!(week = week.as_u16(), ?teams, "closing picks for teams");
    } else {
        info!(week = week.as_u16(), "closing all open picks");
    }

    let last_week = db.last_week_winners(week)?;
    let open = db.open_picks_for_week(week, restrict_to_teams)?;

    let mut changed_picks = Vec::with_capacity(open.len());
    let mut violation_entries = Vec::new();
    for mut pick in open {
        pick.closed = true;
        let repeated_winner =
            pick.team.is_some() && pick.team == last_week.get(&pick.entry_id).copied();
        let never_picked = restrict_to_teams.is_none() && pick.team.is_none();
        if repeated_winner || never_picked {
            pick.status = PickStatus::Violation;
            violation_entries.push(pick.entry_id);
        }
        changed_picks.push(pick);
    }

    let num_closed = changed_picks.len();

    // Picks first, then entries. A crash between the two batches leaves a
    // violation pick without a deactivated entry; re-running this close (or
    // reconciliation) converges because the pick write is idempotent.
    db.write_picks(&changed_picks)?;

    let mut changed_entries = Vec::with_capacity(violation_entries.len());
    for entry_id in violation_entries {
        match db.entry(entry_id) {
            Ok(mut entry) => {
                entry.alive = false;
                changed_entries.push(entry);
            }
            Err(e) if e.is_not_found() => {
                warn!(entry_id = entry_id.as_i64(), "violating pick has no entry");
            }
            Err(e) => return Err(e),
        }
    }
    db.write_entries(&changed_entries)?;

    info!(
        week = week.as_u16(),
        num_closed,
        violations = changed_entries.len(),
        "closed picks"
    );
    Ok(num_closed)
}
