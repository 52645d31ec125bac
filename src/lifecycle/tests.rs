//! Unit tests for the pick/entry lifecycle

use super::*;
use crate::cli::types::{EntryId, TeamId, UserId, Week};
use crate::error::PoolError;
use crate::storage::{PickStatus, PoolDatabase, ScheduledGame};
use crate::tasks::{self, Task};
use chrono::{Duration, TimeZone, Utc};
use std::collections::HashSet;

const BEARS: TeamId = TeamId(6);
const PACKERS: TeamId = TeamId(12);
const COWBOYS: TeamId = TeamId(9);

fn create_test_db() -> (PoolDatabase, UserId) {
    let mut db = PoolDatabase::open_in_memory().unwrap();
    let user = db.add_user("Pat Jones", None).unwrap();
    (db, user.user_id)
}

/// Entry named and picking `team` for `week`.
fn picked_entry(
    db: &mut PoolDatabase,
    user_id: UserId,
    name: &str,
    week: Week,
    team: Option<TeamId>,
) -> crate::storage::Entry {
    let entry = db.create_entry(user_id).unwrap();
    name_entry(db, entry.entry_id, name, week).unwrap();
    if let Some(team) = team {
        db.select_team(entry.entry_id, week, team).unwrap();
    }
    db.entry(entry.entry_id).unwrap()
}

fn results(
    winners: &[TeamId],
    losers: &[TeamId],
) -> Option<(HashSet<TeamId>, HashSet<TeamId>)> {
    Some((
        winners.iter().copied().collect(),
        losers.iter().copied().collect(),
    ))
}

#[test]
fn test_name_entry_creates_first_pick() {
    let (mut db, user_id) = create_test_db();
    let entry = db.create_entry(user_id).unwrap();

    let pick = name_entry(&mut db, entry.entry_id, "Lucky Dog", Week::new(1)).unwrap();
    assert_eq!(pick.entry_id, entry.entry_id);
    assert_eq!(pick.team, None);
    assert!(!pick.closed);
    assert!(db.entry(entry.entry_id).unwrap().activated());

    // Renaming to the same name is a no-op, and the pick is reused
    let again = name_entry(&mut db, entry.entry_id, "Lucky Dog", Week::new(1)).unwrap();
    assert_eq!(again.week, pick.week);
}

#[test]
fn test_name_entry_rejects_duplicate_name() {
    let (mut db, user_id) = create_test_db();
    picked_entry(&mut db, user_id, "Lucky Dog", Week::new(1), None);

    let other = db.create_entry(user_id).unwrap();
    let result = name_entry(&mut db, other.entry_id, "Lucky Dog", Week::new(1));
    assert!(matches!(result, Err(PoolError::DuplicateEntryName { .. })));
}

#[test]
fn test_create_picks_skips_existing() {
    let (mut db, user_id) = create_test_db();
    let a = picked_entry(&mut db, user_id, "A", Week::new(2), None);
    let b = db.create_entry(user_id).unwrap();

    let created = create_picks(&mut db, Week::new(2), &[a.clone(), b.clone()]).unwrap();
    assert_eq!(created, 1);
    assert!(db.pick_for_entry(b.entry_id, Week::new(2)).unwrap().is_some());

    // Re-running creates nothing
    let created = create_picks(&mut db, Week::new(2), &[a, b]).unwrap();
    assert_eq!(created, 0);
}

#[test]
fn test_close_flags_repeated_winner() {
    let (mut db, user_id) = create_test_db();
    let entry = picked_entry(&mut db, user_id, "A", Week::new(1), Some(BEARS));

    // Week 1: Bears win, entry survives
    close_picks(&mut db, Week::new(1), None).unwrap();
    set_pick_status(&mut db, Week::new(1), results(&[BEARS], &[PACKERS])).unwrap();
    assert!(db.entry(entry.entry_id).unwrap().alive);

    // Week 2: same team again
    create_picks(&mut db, Week::new(2), &[entry.clone()]).unwrap();
    db.select_team(entry.entry_id, Week::new(2), BEARS).unwrap();
    close_picks(&mut db, Week::new(2), None).unwrap();

    let pick = db.pick_for_entry(entry.entry_id, Week::new(2)).unwrap().unwrap();
    assert_eq!(pick.status, PickStatus::Violation);
    assert!(!db.entry(entry.entry_id).unwrap().alive);

    // Week 2 result is irrelevant: the violation stands even if Bears win
    set_pick_status(&mut db, Week::new(2), results(&[BEARS], &[PACKERS])).unwrap();
    let pick = db.pick_for_entry(entry.entry_id, Week::new(2)).unwrap().unwrap();
    assert_eq!(pick.status, PickStatus::Violation);
    assert!(!db.entry(entry.entry_id).unwrap().alive);
}

#[test]
fn test_full_close_flags_never_picked() {
    let (mut db, user_id) = create_test_db();
    let entry = picked_entry(&mut db, user_id, "A", Week::new(3), None);

    let closed = close_picks(&mut db, Week::new(3), None).unwrap();
    assert_eq!(closed, 1);

    let pick = db.pick_for_entry(entry.entry_id, Week::new(3)).unwrap().unwrap();
    assert!(pick.closed);
    assert_eq!(pick.status, PickStatus::Violation);
    assert!(!db.entry(entry.entry_id).unwrap().alive);
}

#[test]
fn test_subset_close_ignores_missing_selection() {
    let (mut db, user_id) = create_test_db();
    let picked = picked_entry(&mut db, user_id, "A", Week::new(1), Some(BEARS));
    let unpicked = picked_entry(&mut db, user_id, "B", Week::new(1), None);

    // Bears kicked off: only the Bears pick closes, the sentinel pick is
    // still editable and not a violation.
    let teams: HashSet<TeamId> = [BEARS].into_iter().collect();
    let closed = close_picks(&mut db, Week::new(1), Some(&teams)).unwrap();
    assert_eq!(closed, 1);

    let p = db.pick_for_entry(picked.entry_id, Week::new(1)).unwrap().unwrap();
    assert!(p.closed);
    assert_eq!(p.status, PickStatus::Pending);

    let p = db.pick_for_entry(unpicked.entry_id, Week::new(1)).unwrap().unwrap();
    assert!(!p.closed);
    assert_eq!(p.status, PickStatus::Pending);
    assert!(db.entry(unpicked.entry_id).unwrap().alive);
}

#[test]
fn test_close_with_empty_team_set_is_a_no_op() {
    let (mut db, user_id) = create_test_db();
    picked_entry(&mut db, user_id, "A", Week::new(1), Some(BEARS));

    let closed = close_picks(&mut db, Week::new(1), Some(&HashSet::new())).unwrap();
    assert_eq!(closed, 0);
}

#[test]
fn test_close_is_idempotent() {
    let (mut db, user_id) = create_test_db();
    let entry = picked_entry(&mut db, user_id, "A", Week::new(1), None);

    let first = close_picks(&mut db, Week::new(1), None).unwrap();
    assert_eq!(first, 1);
    let after_first = db.pick_for_entry(entry.entry_id, Week::new(1)).unwrap().unwrap();

    let second = close_picks(&mut db, Week::new(1), None).unwrap();
    assert_eq!(second, 0);
    let after_second = db.pick_for_entry(entry.entry_id, Week::new(1)).unwrap().unwrap();

    assert_eq!(after_first.status, after_second.status);
    assert_eq!(after_first.closed, after_second.closed);
    assert!(!db.entry(entry.entry_id).unwrap().alive);
}

#[test]
fn test_propagation_sets_status_and_cascades() {
    let (mut db, user_id) = create_test_db();
    let winner = picked_entry(&mut db, user_id, "A", Week::new(1), Some(BEARS));
    let loser = picked_entry(&mut db, user_id, "B", Week::new(1), Some(PACKERS));
    let idle = picked_entry(&mut db, user_id, "C", Week::new(1), Some(COWBOYS));

    close_picks(&mut db, Week::new(1), None).unwrap();
    let (wins, losses) =
        set_pick_status(&mut db, Week::new(1), results(&[BEARS], &[PACKERS])).unwrap();
    assert_eq!((wins, losses), (1, 1));

    assert!(db.entry(winner.entry_id).unwrap().alive);
    assert!(!db.entry(loser.entry_id).unwrap().alive);

    // Cowboys game undecided: pick stays pending, entry untouched
    let pick = db.pick_for_entry(idle.entry_id, Week::new(1)).unwrap().unwrap();
    assert_eq!(pick.status, PickStatus::Pending);
    assert!(db.entry(idle.entry_id).unwrap().alive);
}

#[test]
fn test_propagation_revives_buyback_winner() {
    let (mut db, user_id) = create_test_db();
    let entry = picked_entry(&mut db, user_id, "A", Week::new(2), Some(BEARS));
    db.set_alive(entry.entry_id, false).unwrap();
    db.set_buyback(Week::new(2), entry.entry_id).unwrap();

    close_picks(&mut db, Week::new(2), None).unwrap();
    set_pick_status(&mut db, Week::new(2), results(&[BEARS], &[PACKERS])).unwrap();

    // Dead entry whose pick won comes back alive
    assert!(db.entry(entry.entry_id).unwrap().alive);
}

#[test]
fn test_propagation_never_overwrites_violation() {
    let (mut db, user_id) = create_test_db();
    let entry = picked_entry(&mut db, user_id, "A", Week::new(1), Some(BEARS));
    let mut pick = db.pick_for_entry(entry.entry_id, Week::new(1)).unwrap().unwrap();
    pick.closed = true;
    pick.status = PickStatus::Violation;
    db.write_picks(&[pick]).unwrap();
    db.set_alive(entry.entry_id, false).unwrap();

    let (wins, losses) =
        set_pick_status(&mut db, Week::new(1), results(&[BEARS], &[PACKERS])).unwrap();
    assert_eq!((wins, losses), (0, 0));

    let pick = db.pick_for_entry(entry.entry_id, Week::new(1)).unwrap().unwrap();
    assert_eq!(pick.status, PickStatus::Violation);
    assert!(!db.entry(entry.entry_id).unwrap().alive);
}

#[test]
fn test_propagation_is_rerunnable() {
    let (mut db, user_id) = create_test_db();
    let loser = picked_entry(&mut db, user_id, "A", Week::new(1), Some(PACKERS));

    close_picks(&mut db, Week::new(1), None).unwrap();
    set_pick_status(&mut db, Week::new(1), results(&[BEARS], &[PACKERS])).unwrap();
    assert!(!db.entry(loser.entry_id).unwrap().alive);

    // Re-running re-derives the same status; entry state is stable
    set_pick_status(&mut db, Week::new(1), results(&[BEARS], &[PACKERS])).unwrap();
    let pick = db.pick_for_entry(loser.entry_id, Week::new(1)).unwrap().unwrap();
    assert_eq!(pick.status, PickStatus::Loss);
    assert!(!db.entry(loser.entry_id).unwrap().alive);
}

#[test]
fn test_propagation_narrow_scan_matches_full_scan() {
    let (mut db, user_id) = create_test_db();
    let on_bears = picked_entry(&mut db, user_id, "A", Week::new(1), Some(BEARS));
    let elsewhere = picked_entry(&mut db, user_id, "B", Week::new(1), Some(COWBOYS));
    close_picks(&mut db, Week::new(1), None).unwrap();

    // One winner: well under the narrow-scan threshold
    let (wins, losses) =
        set_pick_status(&mut db, Week::new(1), results(&[BEARS], &[PACKERS])).unwrap();
    assert_eq!((wins, losses), (1, 0));
    assert_eq!(
        db.pick_for_entry(on_bears.entry_id, Week::new(1)).unwrap().unwrap().status,
        PickStatus::Win
    );
    // The untouched pick is exactly what the full scan would leave pending
    assert_eq!(
        db.pick_for_entry(elsewhere.entry_id, Week::new(1)).unwrap().unwrap().status,
        PickStatus::Pending
    );
}

#[test]
fn test_reconcile_deactivates_entries_without_picks() {
    let (mut db, user_id) = create_test_db();
    let survivor = picked_entry(&mut db, user_id, "A", Week::new(3), Some(BEARS));
    let pending = picked_entry(&mut db, user_id, "B", Week::new(3), Some(COWBOYS));
    let orphan = db.create_entry(user_id).unwrap();

    close_picks(&mut db, Week::new(3), None).unwrap();
    set_pick_status(&mut db, Week::new(3), results(&[BEARS], &[PACKERS])).unwrap();

    let (queue, mut rx) = tasks::channel();
    let alive = deactivate_dead_entries(&mut db, &queue, Week::new(3)).unwrap();

    // Only the winning pick keeps its entry in the returned alive set
    let alive_ids: Vec<_> = alive.iter().map(|e| e.entry_id).collect();
    assert_eq!(alive_ids, vec![survivor.entry_id]);
    assert!(db.entry(pending.entry_id).unwrap().alive);

    // The orphan is dead and its naming deferred
    assert!(!db.entry(orphan.entry_id).unwrap().alive);
    let task = rx.try_recv().unwrap();
    assert_eq!(
        task,
        Task::NameUnnamedEntries {
            user_id,
            entry_ids: vec![orphan.entry_id],
            week: Week::new(3),
        }
    );
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_reconcile_keeps_buyback_entries_alive() {
    let (mut db, user_id) = create_test_db();
    let entry = picked_entry(&mut db, user_id, "A", Week::new(2), Some(PACKERS));
    db.set_buyback(Week::new(2), entry.entry_id).unwrap();

    let (queue, _rx) = tasks::channel();
    let alive = deactivate_dead_entries(&mut db, &queue, Week::new(2)).unwrap();
    assert_eq!(alive.len(), 1);
    assert_eq!(alive[0].entry_id, entry.entry_id);
}

#[test]
fn test_auto_naming_creates_violation_pick() {
    let (mut db, user_id) = create_test_db();
    // One pre-existing named entry pushes the generated suffix to 2
    picked_entry(&mut db, user_id, "Pat Jones #1", Week::new(3), Some(BEARS));
    let orphan = db.create_entry(user_id).unwrap();

    let task = Task::NameUnnamedEntries {
        user_id,
        entry_ids: vec![orphan.entry_id],
        week: Week::new(3),
    };
    tasks::handle_task(&mut db, &task).unwrap();

    let entry = db.entry(orphan.entry_id).unwrap();
    assert_eq!(entry.name.as_deref(), Some("Pat Jones #2"));
    let pick = db.pick_for_entry(orphan.entry_id, Week::new(3)).unwrap().unwrap();
    assert_eq!(pick.status, PickStatus::Violation);

    // At-least-once delivery: a second run is a no-op
    tasks::handle_task(&mut db, &task).unwrap();
    let entry = db.entry(orphan.entry_id).unwrap();
    assert_eq!(entry.name.as_deref(), Some("Pat Jones #2"));
    assert_eq!(db.entries_for_user(user_id).unwrap().len(), 2);
}

#[test]
fn test_auto_naming_resumes_after_partial_failure() {
    let (mut db, user_id) = create_test_db();
    picked_entry(&mut db, user_id, "Pat Jones #1", Week::new(3), Some(BEARS));

    // Crash window one: the name was written but the pick never appeared
    let half_named = db.create_entry(user_id).unwrap();
    db.set_entry_name(half_named.entry_id, "Pat Jones #2").unwrap();

    // Crash window two: the pick exists but was never stamped
    let half_picked = db.create_entry(user_id).unwrap();
    name_entry(&mut db, half_picked.entry_id, "Pat Jones #3", Week::new(3)).unwrap();

    let task = Task::NameUnnamedEntries {
        user_id,
        entry_ids: vec![half_named.entry_id, half_picked.entry_id],
        week: Week::new(3),
    };
    tasks::handle_task(&mut db, &task).unwrap();

    for (entry_id, name) in [
        (half_named.entry_id, "Pat Jones #2"),
        (half_picked.entry_id, "Pat Jones #3"),
    ] {
        let entry = db.entry(entry_id).unwrap();
        assert_eq!(entry.name.as_deref(), Some(name));
        let pick = db.pick_for_entry(entry_id, Week::new(3)).unwrap().unwrap();
        assert_eq!(pick.status, PickStatus::Violation);
    }
}

#[test]
fn test_auto_naming_skips_vanished_entry() {
    let (mut db, user_id) = create_test_db();
    let orphan = db.create_entry(user_id).unwrap();

    // A dangling id in the batch must not keep the real orphan unnamed
    let task = Task::NameUnnamedEntries {
        user_id,
        entry_ids: vec![EntryId::new(999), orphan.entry_id],
        week: Week::new(1),
    };
    tasks::handle_task(&mut db, &task).unwrap();

    let entry = db.entry(orphan.entry_id).unwrap();
    assert_eq!(entry.name.as_deref(), Some("Pat Jones #1"));
    assert_eq!(
        db.pick_for_entry(orphan.entry_id, Week::new(1)).unwrap().unwrap().status,
        PickStatus::Violation
    );
}

#[test]
fn test_buyback_before_deadline_reuses_current_pick() {
    let (mut db, user_id) = create_test_db();
    let kickoff = Utc.with_ymd_and_hms(2026, 9, 13, 17, 0, 0).unwrap();
    db.insert_games(
        Week::new(1),
        &[ScheduledGame {
            home: BEARS,
            visiting: PACKERS,
            kickoff,
        }],
    )
    .unwrap();

    let entry = picked_entry(&mut db, user_id, "A", Week::new(1), None);
    db.set_alive(entry.entry_id, false).unwrap();

    let now = kickoff - Duration::hours(2);
    let email = buyback_entry(&mut db, entry.entry_id, now).unwrap();
    assert_eq!(email, None);

    assert!(db.entry(entry.entry_id).unwrap().alive);
    let pick = db.pick_for_entry(entry.entry_id, Week::new(1)).unwrap().unwrap();
    assert!(pick.buyback);
}

#[test]
fn test_buyback_after_deadline_creates_fresh_pick() {
    let (mut db, user_id) = create_test_db();
    let week2_first = Utc.with_ymd_and_hms(2026, 9, 20, 17, 0, 0).unwrap();
    db.insert_games(
        Week::new(1),
        &[ScheduledGame {
            home: BEARS,
            visiting: PACKERS,
            kickoff: week2_first - Duration::days(7),
        }],
    )
    .unwrap();
    // Week 2 needs a later game so the week is still in play after its
    // deadline has passed.
    db.insert_games(
        Week::new(2),
        &[
            ScheduledGame {
                home: COWBOYS,
                visiting: PACKERS,
                kickoff: week2_first,
            },
            ScheduledGame {
                home: BEARS,
                visiting: TeamId::new(21),
                kickoff: week2_first + Duration::hours(3),
            },
        ],
    )
    .unwrap();

    let entry = picked_entry(&mut db, user_id, "A", Week::new(1), Some(PACKERS));
    db.set_alive(entry.entry_id, false).unwrap();

    let now = week2_first + Duration::hours(1);
    let email = buyback_entry(&mut db, entry.entry_id, now).unwrap();
    assert_eq!(email, Some(user_id));

    assert!(db.entry(entry.entry_id).unwrap().alive);
    // Last week's pick carries the flag, this week got a fresh pick
    let last = db.pick_for_entry(entry.entry_id, Week::new(1)).unwrap().unwrap();
    assert!(last.buyback);
    let fresh = db.pick_for_entry(entry.entry_id, Week::new(2)).unwrap().unwrap();
    assert!(!fresh.buyback);
    assert_eq!(fresh.team, None);
    assert_eq!(fresh.status, PickStatus::Pending);
}

#[test]
fn test_buyback_without_target_pick() {
    let (mut db, user_id) = create_test_db();
    let kickoff = Utc.with_ymd_and_hms(2026, 9, 13, 17, 0, 0).unwrap();
    db.insert_games(
        Week::new(1),
        &[ScheduledGame {
            home: BEARS,
            visiting: PACKERS,
            kickoff,
        }],
    )
    .unwrap();

    // Entry has no pick at all for the current week
    let entry = db.create_entry(user_id).unwrap();
    db.set_alive(entry.entry_id, false).unwrap();

    let now = kickoff - Duration::hours(2);
    let email = buyback_entry(&mut db, entry.entry_id, now).unwrap();
    assert_eq!(email, None);

    // Still revived, but nothing was flagged or created
    assert!(db.entry(entry.entry_id).unwrap().alive);
    assert!(db.pick_for_entry(entry.entry_id, Week::new(1)).unwrap().is_none());
}
