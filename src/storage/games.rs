//! Game record store queries

use super::{models::Game, schema::PoolDatabase};
use crate::cli::types::{GameId, TeamId, Week};
use crate::error::{PoolError, Result};
use crate::teams;
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Row};
use std::collections::HashSet;
use tracing::{info, warn};

/// One matchup of a week schedule, before it is assigned a game id.
#[derive(Debug, Clone, Copy)]
pub struct ScheduledGame {
    pub home: TeamId,
    pub visiting: TeamId,
    pub kickoff: DateTime<Utc>,
}

impl PoolDatabase {
    /// Bulk-insert a week's schedule. Used at season setup; the schedule
    /// file format itself belongs to the loader, not this store.
    pub fn insert_games(&mut self, week: Week, games: &[ScheduledGame]) -> Result<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO games (week, home, visiting, kickoff) VALUES (?, ?, ?, ?)",
            )?;
            for game in games {
                stmt.execute(params![
                    week.as_u16(),
                    game.home.as_u16(),
                    game.visiting.as_u16(),
                    game.kickoff.timestamp()
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Record final scores for a game and derive the winner.
    ///
    /// The winner stays undetermined on a tie; survivor picks on a tied
    /// game remain pending.
    pub fn record_result(
        &mut self,
        game_id: GameId,
        home_score: u32,
        visiting_score: u32,
    ) -> Result<Game> {
        let mut game = self.game(game_id)?;
        info!(
            home = teams::shortname(game.home),
            home_score,
            visiting = teams::shortname(game.visiting),
            visiting_score,
            "recording game result"
        );
        game.home_score = Some(home_score);
        game.visiting_score = Some(visiting_score);
        game.winner = match home_score.cmp(&visiting_score) {
            std::cmp::Ordering::Greater => Some(game.home),
            std::cmp::Ordering::Less => Some(game.visiting),
            std::cmp::Ordering::Equal => {
                warn!(game_id = game_id.as_i64(), "tie game, winner undetermined");
                None
            }
        };
        self.conn.execute(
            "UPDATE games SET home_score = ?, visiting_score = ?, winner = ? WHERE game_id = ?",
            params![
                home_score,
                visiting_score,
                game.winner.map(|t| t.as_u16()),
                game_id.as_i64()
            ],
        )?;
        Ok(game)
    }

    /// Fetch a single game.
    pub fn game(&self, game_id: GameId) -> Result<Game> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {GAME_COLUMNS} FROM games WHERE game_id = ?"
        ))?;
        let result = stmt.query_row(params![game_id.as_i64()], row_to_game);
        match result {
            Ok(game) => Ok(game),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(PoolError::GameNotFound(game_id)),
            Err(e) => Err(e.into()),
        }
    }

    /// All games for a week in kickoff order.
    pub fn games_for_week(&self, week: Week) -> Result<Vec<Game>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {GAME_COLUMNS} FROM games WHERE week = ? ORDER BY kickoff, game_id"
        ))?;
        let rows = stmt.query_map(params![week.as_u16()], row_to_game)?;

        let mut games = Vec::new();
        for row in rows {
            games.push(row?);
        }
        Ok(games)
    }

    /// True once every game of the week has a determined winner.
    pub fn week_complete(&self, week: Week) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM games WHERE week = ? AND winner IS NULL",
            params![week.as_u16()],
            |row| row.get(0),
        )?;
        Ok(count == 0)
    }

    /// Winning teams of a week's decided games.
    pub fn winners_for_week(&self, week: Week) -> Result<HashSet<TeamId>> {
        let mut stmt = self.conn.prepare(
            "SELECT winner FROM games WHERE week = ? AND winner IS NOT NULL",
        )?;
        let rows = stmt.query_map(params![week.as_u16()], |row| {
            let team: u16 = row.get(0)?;
            Ok(TeamId::new(team))
        })?;

        let mut winners = HashSet::new();
        for row in rows {
            winners.insert(row?);
        }
        Ok(winners)
    }

    /// Winner and loser team sets for a week's decided games. This is the
    /// game results interface the propagation process consumes.
    pub fn results_for_week(&self, week: Week) -> Result<(HashSet<TeamId>, HashSet<TeamId>)> {
        let mut winners = HashSet::new();
        let mut losers = HashSet::new();
        for game in self.games_for_week(week)? {
            match game.winner {
                Some(w) if w == game.home => {
                    winners.insert(game.home);
                    losers.insert(game.visiting);
                }
                Some(_) => {
                    winners.insert(game.visiting);
                    losers.insert(game.home);
                }
                None => {}
            }
        }
        Ok((winners, losers))
    }

    /// The week's selection deadline: its earliest kickoff.
    pub fn week_deadline(&self, week: Week) -> Result<Option<DateTime<Utc>>> {
        let kickoff: Option<i64> = self.conn.query_row(
            "SELECT MIN(kickoff) FROM games WHERE week = ?",
            params![week.as_u16()],
            |row| row.get(0),
        )?;
        Ok(kickoff.map(|ts| Utc.timestamp_opt(ts, 0).single().unwrap_or_default()))
    }

    /// Whether the week's deadline has passed at `now`. A week with no
    /// scheduled games has no deadline and counts as not passed.
    pub fn deadline_passed(&self, week: Week, now: DateTime<Utc>) -> Result<bool> {
        Ok(match self.week_deadline(week)? {
            Some(deadline) => now >= deadline,
            None => false,
        })
    }

    /// The week currently in play: the first week that still has games
    /// ahead of `now`, or the last scheduled week once the season is over.
    /// Its deadline may or may not have passed yet.
    pub fn current_week(&self, now: DateTime<Utc>) -> Result<Week> {
        let upcoming: Option<u16> = self.conn.query_row(
            "SELECT week FROM games GROUP BY week HAVING MAX(kickoff) > ?
             ORDER BY week LIMIT 1",
            params![now.timestamp()],
            |row| row.get(0),
        ).map(Some).or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            e => Err(e),
        })?;
        if let Some(week) = upcoming {
            return Ok(Week::new(week));
        }
        let last: Option<u16> = self.conn.query_row(
            "SELECT MAX(week) FROM games",
            [],
            |row| row.get(0),
        )?;
        last.map(Week::new).ok_or(PoolError::EmptySchedule)
    }

    /// Delete every game record. Full season reset only.
    pub fn clear_games(&mut self) -> Result<()> {
        self.conn.execute("DELETE FROM games", [])?;
        Ok(())
    }
}

const GAME_COLUMNS: &str =
    "game_id, week, home, visiting, kickoff, home_score, visiting_score, winner";

pub(crate) fn row_to_game(row: &Row) -> rusqlite::Result<Game> {
    let kickoff: i64 = row.get(4)?;
    Ok(Game {
        game_id: GameId::new(row.get(0)?),
        week: Week::new(row.get(1)?),
        home: TeamId::new(row.get(2)?),
        visiting: TeamId::new(row.get(3)?),
        kickoff: Utc.timestamp_opt(kickoff, 0).single().unwrap_or_default(),
        home_score: row.get(5)?,
        visiting_score: row.get(6)?,
        winner: row.get::<_, Option<u16>>(7)?.map(TeamId::new),
    })
}
