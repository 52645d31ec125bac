//! Result propagation process

use crate::cli::types::{TeamId, Week};
use crate::error::{PoolError, Result};
use crate::storage::{PickStatus, PoolDatabase};
use std::collections::HashSet;
use tracing::{error, info, warn};

/// Below this many winning teams the scan narrows to picks on teams that
/// actually played, instead of every pick of the week.
pub const NARROW_SCAN_THRESHOLD: usize = 10;

/// Apply game outcomes to the week's picks and cascade to entry state.
///
/// Results come from the game record store unless supplied directly (used
/// by tests and by callers that already hold them). Violation picks are
/// excluded by the query and never overwritten. Picks on teams in neither
/// set stay pending. Changed picks are written in one batch, then the
/// owning entries: a losing pick kills an alive entry, a winning pick
/// revives a dead one — which is how a buyback re-enters the alive set.
///
/// Safe to re-run before the next week's picks exist: an already-resolved
/// pick re-derives the same status, so the entry cascade is stable.
/// Returns `(winner_picks, loser_picks)`.
pub fn set_pick_status(
    db: &mut PoolDatabase,
    week: Week,
    game_results: Option<(HashSet<TeamId>, HashSet<TeamId>)>,
) -> Result<(usize, usize)> {
    let (winners, losers) = match game_results {
        Some(results) => results,
        None => db.results_for_week(week)?,
    };

    let narrow: Option<HashSet<TeamId>> =
        if !winners.is_empty() && winners.len() < NARROW_SCAN_THRESHOLD {
            Some(winners.union(&losers).copied().collect())
        } else {
            None
        };
    info!(
        week = week.as_u16(),
        winners = winners.len(),
        losers = losers.len(),
        narrowed = narrow.is_some(),
        "setting pick status"
    );

    let mut num_winners = 0;
    let mut num_losers = 0;
    let mut changed_picks = Vec::new();
    for mut pick in db.unresolved_picks_for_week(week, narrow.as_ref())? {
        if pick.status == PickStatus::Violation {
            // The query filters these out; reaching one means the store and
            // the scan disagree. Refuse to overwrite it.
            error!(
                error = %PoolError::InconsistentState {
                    entry_id: pick.entry_id,
                    week: pick.week,
                },
                "skipping violation pick"
            );
            continue;
        }
        let team = match pick.team {
            Some(team) => team,
            None => continue,
        };
        if winners.contains(&team) {
            num_winners += 1;
            pick.status = PickStatus::Win;
        } else if losers.contains(&team) {
            num_losers += 1;
            pick.status = PickStatus::Loss;
        } else {
            continue;
        }
        changed_picks.push(pick);
    }
    db.write_picks(&changed_picks)?;

    let mut changed_entries = Vec::new();
    for pick in &changed_picks {
        let mut entry = match db.entry(pick.entry_id) {
            Ok(entry) => entry,
            Err(e) if e.is_not_found() => {
                warn!(entry_id = pick.entry_id.as_i64(), "pick has no entry");
                continue;
            }
            Err(e) => return Err(e),
        };
        if entry.alive && pick.status == PickStatus::Loss {
            entry.alive = false;
            changed_entries.push(entry);
        } else if !entry.alive && pick.status == PickStatus::Win {
            entry.alive = true;
            changed_entries.push(entry);
        }
    }
    db.write_entries(&changed_entries)?;

    info!(week = week.as_u16(), num_winners, num_losers, "pick status set");
    Ok((num_winners, num_losers))
}
