//! Unit tests for command helpers

use super::resolve_week;
use super::standings::build_report;
use crate::cli::types::{TeamId, Week};
use crate::lifecycle;
use crate::storage::{PoolDatabase, ScheduledGame};
use chrono::{Duration, Utc};
use std::collections::HashSet;

fn seeded_db() -> PoolDatabase {
    let mut db = PoolDatabase::open_in_memory().unwrap();
    let user = db.add_user("Pat Jones", None).unwrap();

    let a = db.create_entry(user.user_id).unwrap();
    lifecycle::name_entry(&mut db, a.entry_id, "Front Runner", Week::new(1)).unwrap();
    db.select_team(a.entry_id, Week::new(1), TeamId::new(6)).unwrap();

    let b = db.create_entry(user.user_id).unwrap();
    lifecycle::name_entry(&mut db, b.entry_id, "Long Shot", Week::new(1)).unwrap();

    db
}

#[test]
fn test_resolve_week_follows_schedule() {
    let mut db = seeded_db();

    // An explicit week always wins
    assert_eq!(resolve_week(&db, Some(Week::new(4))).unwrap(), Week::new(4));
    // Without a schedule there is no week to fall back on
    assert!(resolve_week(&db, None).is_err());

    db.insert_games(
        Week::new(2),
        &[ScheduledGame {
            home: TeamId::new(6),
            visiting: TeamId::new(12),
            kickoff: Utc::now() + Duration::days(1),
        }],
    )
    .unwrap();
    assert_eq!(resolve_week(&db, None).unwrap(), Week::new(2));
}

#[test]
fn test_standings_report_open_week() {
    let db = seeded_db();
    let report = build_report(&db, Week::new(1)).unwrap();

    assert_eq!(report.week, 1);
    assert_eq!(report.alive.len(), 2);
    assert_eq!(report.violations, 0);
    assert_eq!(report.no_pick, 1);
    assert!(!report.all_closed);

    let front = &report.alive[0];
    assert_eq!(front.name.as_deref(), Some("Front Runner"));
    assert_eq!(front.team.as_deref(), Some("Chicago Bears"));
    assert_eq!(front.status.as_deref(), Some("pending"));
}

#[test]
fn test_standings_report_after_full_close() {
    let mut db = seeded_db();
    lifecycle::close_picks(&mut db, Week::new(1), None).unwrap();
    lifecycle::set_pick_status(
        &mut db,
        Week::new(1),
        Some((
            [TeamId::new(6)].into_iter().collect::<HashSet<_>>(),
            [TeamId::new(12)].into_iter().collect::<HashSet<_>>(),
        )),
    )
    .unwrap();

    let report = build_report(&db, Week::new(1)).unwrap();
    // "Long Shot" never picked: violation at close, dropped from alive
    assert_eq!(report.alive.len(), 1);
    assert_eq!(report.alive[0].name.as_deref(), Some("Front Runner"));
    assert_eq!(report.violations, 1);
    assert!(report.all_closed);
    assert!(report.all_resolved);
}

#[test]
fn test_standings_report_serializes() {
    let db = seeded_db();
    let report = build_report(&db, Week::new(1)).unwrap();
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"week\":1"));
    assert!(json.contains("Front Runner"));
}
