//! Game schedule and result command implementations

use super::{open_db, resolve_week};
use crate::cli::types::{GameId, TeamId, Week};
use crate::storage::ScheduledGame;
use crate::teams;
use chrono::{DateTime, Utc};

/// Handle the game add command
pub fn handle_game_add(
    week: Week,
    home: TeamId,
    visiting: TeamId,
    kickoff: String,
) -> anyhow::Result<()> {
    let kickoff: DateTime<Utc> = DateTime::parse_from_rfc3339(&kickoff)?.with_timezone(&Utc);
    let mut db = open_db()?;
    db.insert_games(
        week,
        &[ScheduledGame {
            home,
            visiting,
            kickoff,
        }],
    )?;
    println!(
        "✓ Week {}: {} at {} ({})",
        week,
        teams::shortname(visiting),
        teams::shortname(home),
        kickoff.to_rfc3339()
    );
    Ok(())
}

/// Handle the game result command
pub fn handle_game_result(
    game: GameId,
    home_score: u32,
    visiting_score: u32,
) -> anyhow::Result<()> {
    let mut db = open_db()?;
    let game = db.record_result(game, home_score, visiting_score)?;
    match game.winner {
        Some(winner) => println!("✓ {} win", teams::fullname(winner)),
        None => println!("✓ Tie recorded, no winner"),
    }
    Ok(())
}

/// Handle the game list command
pub fn handle_game_list(week: Option<Week>) -> anyhow::Result<()> {
    let db = open_db()?;
    let week = resolve_week(&db, week)?;
    let games = db.games_for_week(week)?;
    if games.is_empty() {
        println!("No games scheduled for week {week}");
        return Ok(());
    }
    for game in games {
        let score = match (game.home_score, game.visiting_score) {
            (Some(h), Some(v)) => format!("{v}-{h} final"),
            _ => "not played".to_string(),
        };
        println!(
            "#{} {} at {} — {} ({})",
            game.game_id,
            teams::shortname(game.visiting),
            teams::shortname(game.home),
            score,
            game.kickoff.to_rfc3339()
        );
    }
    Ok(())
}

/// Handle the game reset command
pub fn handle_game_reset() -> anyhow::Result<()> {
    let mut db = open_db()?;
    db.clear_games()?;
    println!("✓ Schedule cleared");
    Ok(())
}
