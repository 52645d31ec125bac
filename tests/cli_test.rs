//! CLI parsing tests

use clap::Parser;
use survivor_pool::cli::{Commands, EntryCmd, SurvivorPool, WeekCmd};
use survivor_pool::{EntryId, TeamId, Week};

#[test]
fn test_pick_accepts_team_abbreviation() {
    let app = SurvivorPool::try_parse_from([
        "survivor-pool",
        "pick",
        "--entry",
        "12",
        "--week",
        "3",
        "--team",
        "chi",
    ])
    .unwrap();

    match app.command {
        Commands::Pick { entry, week, team } => {
            assert_eq!(entry, EntryId::new(12));
            assert_eq!(week, Some(Week::new(3)));
            assert_eq!(team, TeamId::new(6));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_pick_rejects_unknown_team() {
    let result = SurvivorPool::try_parse_from([
        "survivor-pool",
        "pick",
        "--entry",
        "12",
        "--team",
        "NOPE",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_week_close_collects_team_subset() {
    let app = SurvivorPool::try_parse_from([
        "survivor-pool",
        "week",
        "close",
        "--week",
        "2",
        "--team",
        "CHI",
        "--team",
        "GB",
    ])
    .unwrap();

    match app.command {
        Commands::Week {
            cmd: WeekCmd::Close { week, team },
        } => {
            assert_eq!(week, Some(Week::new(2)));
            assert_eq!(team, vec![TeamId::new(6), TeamId::new(12)]);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_week_omitted_defers_to_schedule() {
    let app = SurvivorPool::try_parse_from(["survivor-pool", "week", "close"]).unwrap();
    match app.command {
        Commands::Week {
            cmd: WeekCmd::Close { week, team },
        } => {
            // No explicit week: the handler derives it from the schedule
            assert_eq!(week, None);
            assert!(team.is_empty());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_entry_name_arguments() {
    let app = SurvivorPool::try_parse_from([
        "survivor-pool",
        "entry",
        "name",
        "--entry",
        "4",
        "--name",
        "Lucky Dog",
        "--week",
        "1",
    ])
    .unwrap();

    match app.command {
        Commands::Entry {
            cmd: EntryCmd::Name { entry, name, week },
        } => {
            assert_eq!(entry, EntryId::new(4));
            assert_eq!(name, "Lucky Dog");
            assert_eq!(week, Some(Week::new(1)));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}
