//! Pick ledger queries

use super::{
    models::{Pick, PickCursor, PickStatus},
    schema::PoolDatabase,
};
use crate::cli::types::{EntryId, TeamId, UserId, Week};
use crate::error::{pick_insert_error, PoolError, Result};
use crate::storage::models::Entry;
use crate::teams;
use rusqlite::{params, Row};
use std::collections::{HashMap, HashSet};
use tracing::info;

impl PoolDatabase {
    /// Insert a new pick for an entry: sentinel team, open, pending.
    ///
    /// Fails with `DuplicatePick` if the `(week, entry_id)` key already
    /// exists; lifecycle callers check first and treat a clash as a
    /// mis-sequenced call.
    pub fn create_pick(&mut self, entry: &Entry, week: Week) -> Result<Pick> {
        let now = Self::now_ts();
        self.conn
            .execute(
                "INSERT INTO picks (week, entry_id, user_id, team, closed, buyback, status, modified)
                 VALUES (?, ?, ?, NULL, 0, 0, ?, ?)",
                params![
                    week.as_u16(),
                    entry.entry_id.as_i64(),
                    entry.user_id.as_i64(),
                    PickStatus::Pending.as_i64(),
                    now
                ],
            )
            .map_err(|e| pick_insert_error(e, entry.entry_id, week))?;
        Ok(Pick {
            entry_id: entry.entry_id,
            user_id: entry.user_id,
            week,
            team: None,
            closed: false,
            buyback: false,
            status: PickStatus::Pending,
            modified: now,
        })
    }

    /// Record a team selection on an existing, still-open pick.
    pub fn select_team(&mut self, entry_id: EntryId, week: Week, team: TeamId) -> Result<()> {
        info!(
            entry_id = entry_id.as_i64(),
            week = week.as_u16(),
            team = teams::shortname(team),
            "selecting team"
        );
        let pick = self
            .pick_for_entry(entry_id, week)?
            .ok_or(PoolError::PickNotFound { entry_id, week })?;
        if pick.closed {
            return Err(PoolError::PickLocked { entry_id, week });
        }
        self.conn.execute(
            "UPDATE picks SET team = ?, modified = ? WHERE week = ? AND entry_id = ?",
            params![
                team.as_u16(),
                Self::now_ts(),
                week.as_u16(),
                entry_id.as_i64()
            ],
        )?;
        Ok(())
    }

    /// Flag a pick as a buyback reactivation.
    pub fn set_buyback(&mut self, week: Week, entry_id: EntryId) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE picks SET buyback = 1, modified = ? WHERE week = ? AND entry_id = ?",
            params![Self::now_ts(), week.as_u16(), entry_id.as_i64()],
        )?;
        if changed == 0 {
            return Err(PoolError::PickNotFound { entry_id, week });
        }
        Ok(())
    }

    /// Persist a batch of changed picks in one transaction, bumping the
    /// modified stamp on each.
    pub fn write_picks(&mut self, picks: &[Pick]) -> Result<()> {
        let now = Self::now_ts();
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "UPDATE picks SET team = ?, closed = ?, buyback = ?, status = ?, modified = ?
                 WHERE week = ? AND entry_id = ?",
            )?;
            for pick in picks {
                stmt.execute(params![
                    pick.team.map(|t| t.as_u16()),
                    pick.closed,
                    pick.buyback,
                    pick.status.as_i64(),
                    now,
                    pick.week.as_u16(),
                    pick.entry_id.as_i64()
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// The pick for one entry and week, if any.
    pub fn pick_for_entry(&self, entry_id: EntryId, week: Week) -> Result<Option<Pick>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PICK_COLUMNS} FROM picks WHERE week = ? AND entry_id = ?"
        ))?;
        let result = stmt.query_row(params![week.as_u16(), entry_id.as_i64()], row_to_pick);
        match result {
            Ok(pick) => Ok(Some(pick)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All of a user's picks for a week, across their entries.
    pub fn picks_for_user(&self, user_id: UserId, week: Week) -> Result<Vec<Pick>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PICK_COLUMNS} FROM picks
             WHERE week = ? AND user_id = ? ORDER BY entry_id"
        ))?;
        let rows = stmt.query_map(params![week.as_u16(), user_id.as_i64()], row_to_pick)?;

        let mut picks = Vec::new();
        for row in rows {
            picks.push(row?);
        }
        Ok(picks)
    }

    /// All picks for a week, keyed by owning entry.
    pub fn picks_for_week(&self, week: Week) -> Result<HashMap<EntryId, Pick>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {PICK_COLUMNS} FROM picks WHERE week = ?"))?;
        let rows = stmt.query_map(params![week.as_u16()], row_to_pick)?;

        let mut picks = HashMap::new();
        for row in rows {
            let pick = row?;
            picks.insert(pick.entry_id, pick);
        }
        Ok(picks)
    }

    /// Open picks for a week, optionally restricted to a team subset.
    /// Already-closed picks are excluded by the query, which is what makes
    /// re-running the closing process a no-op.
    pub fn open_picks_for_week(
        &self,
        week: Week,
        restrict_to_teams: Option<&HashSet<TeamId>>,
    ) -> Result<Vec<Pick>> {
        let mut query = format!(
            "SELECT {PICK_COLUMNS} FROM picks WHERE week = ? AND closed = 0"
        );
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(week.as_u16())];

        if let Some(teams) = restrict_to_teams {
            query.push_str(" AND team IN (");
            for (i, team) in teams.iter().enumerate() {
                if i > 0 {
                    query.push_str(", ");
                }
                query.push('?');
                params.push(Box::new(team.as_u16()));
            }
            query.push(')');
        }
        query.push_str(" ORDER BY entry_id");

        self.collect_picks(&query, &params)
    }

    /// Picks for a week still eligible for a result, i.e. everything except
    /// violations. `narrow_to_teams` limits the scan to picks selecting one
    /// of the given teams; it is a pure performance optimization.
    pub fn unresolved_picks_for_week(
        &self,
        week: Week,
        narrow_to_teams: Option<&HashSet<TeamId>>,
    ) -> Result<Vec<Pick>> {
        let mut query = format!(
            "SELECT {PICK_COLUMNS} FROM picks WHERE week = ? AND status != ?"
        );
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![
            Box::new(week.as_u16()),
            Box::new(PickStatus::Violation.as_i64()),
        ];

        if let Some(teams) = narrow_to_teams {
            query.push_str(" AND team IN (");
            for (i, team) in teams.iter().enumerate() {
                if i > 0 {
                    query.push_str(", ");
                }
                query.push('?');
                params.push(Box::new(team.as_u16()));
            }
            query.push(')');
        }
        query.push_str(" ORDER BY entry_id");

        self.collect_picks(&query, &params)
    }

    /// One page of the restartable scan over closed picks, ordered by
    /// `(entry_id, week)`.
    ///
    /// Passing the cursor taken from the last pick of the previous page
    /// resumes the scan; re-reading a page after a partial failure is safe
    /// because every status transition is filtered by the queries that
    /// apply it.
    pub fn closed_picks_page(
        &self,
        cursor: Option<PickCursor>,
        limit: usize,
    ) -> Result<Vec<Pick>> {
        let mut query = format!("SELECT {PICK_COLUMNS} FROM picks WHERE closed = 1");
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(cursor) = cursor {
            query.push_str(" AND (entry_id, week) > (?, ?)");
            params.push(Box::new(cursor.entry_id.as_i64()));
            params.push(Box::new(cursor.week.as_u16()));
        }
        query.push_str(" ORDER BY entry_id, week LIMIT ?");
        params.push(Box::new(limit as i64));

        self.collect_picks(&query, &params)
    }

    /// True once no open pick remains for the week.
    pub fn picks_closed(&self, week: Week) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM picks WHERE week = ? AND closed = 0",
            params![week.as_u16()],
            |row| row.get(0),
        )?;
        Ok(count == 0)
    }

    /// True once no pending pick remains for the week.
    pub fn picks_resolved(&self, week: Week) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM picks WHERE week = ? AND status = ?",
            params![week.as_u16(), PickStatus::Pending.as_i64()],
            |row| row.get(0),
        )?;
        Ok(count == 0)
    }

    /// Count of picks still on the no-selection sentinel for a week.
    pub fn no_pick_count(&self, week: Week) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM picks WHERE week = ? AND team IS NULL",
            params![week.as_u16()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Count of violation picks for a week.
    pub fn violation_count(&self, week: Week) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM picks WHERE week = ? AND status = ?",
            params![week.as_u16(), PickStatus::Violation.as_i64()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// How many picks selected each team in a week. Picks without a
    /// selection are counted under `None`.
    pub fn team_counts(&self, week: Week) -> Result<HashMap<Option<TeamId>, usize>> {
        let mut stmt = self.conn.prepare(
            "SELECT team, COUNT(*) FROM picks WHERE week = ? GROUP BY team",
        )?;
        let rows = stmt.query_map(params![week.as_u16()], |row| {
            let team: Option<u16> = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok((team.map(TeamId::new), count as usize))
        })?;

        let mut counts = HashMap::new();
        for row in rows {
            let (team, count) = row?;
            counts.insert(team, count);
        }
        Ok(counts)
    }

    /// Pick counts per status for a week.
    pub fn status_counts(&self, week: Week) -> Result<HashMap<PickStatus, usize>> {
        let mut stmt = self.conn.prepare(
            "SELECT status, COUNT(*) FROM picks WHERE week = ? GROUP BY status",
        )?;
        let rows = stmt.query_map(params![week.as_u16()], |row| {
            let status: i64 = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok((status, count as usize))
        })?;

        let mut counts = HashMap::new();
        for row in rows {
            let (status, count) = row?;
            if let Some(status) = PickStatus::from_i64(status) {
                counts.insert(status, count);
            }
        }
        Ok(counts)
    }

    /// The team each entry won with in the previous week, keyed by entry.
    /// Empty for week 1.
    pub fn last_week_winners(&self, week: Week) -> Result<HashMap<EntryId, TeamId>> {
        let prev = match week.prev() {
            Some(prev) => prev,
            None => return Ok(HashMap::new()),
        };
        let mut stmt = self.conn.prepare(
            "SELECT entry_id, team FROM picks
             WHERE week = ? AND status = ? AND team IS NOT NULL",
        )?;
        let rows = stmt.query_map(
            params![prev.as_u16(), PickStatus::Win.as_i64()],
            |row| {
                let entry_id: i64 = row.get(0)?;
                let team: u16 = row.get(1)?;
                Ok((EntryId::new(entry_id), TeamId::new(team)))
            },
        )?;

        let mut winners = HashMap::new();
        for row in rows {
            let (entry_id, team) = row?;
            winners.insert(entry_id, team);
        }
        Ok(winners)
    }

    fn collect_picks(
        &self,
        query: &str,
        params: &[Box<dyn rusqlite::ToSql>],
    ) -> Result<Vec<Pick>> {
        let mut stmt = self.conn.prepare(query)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(params.iter().map(|p| p.as_ref())),
            row_to_pick,
        )?;

        let mut picks = Vec::new();
        for row in rows {
            picks.push(row?);
        }
        Ok(picks)
    }
}

const PICK_COLUMNS: &str = "week, entry_id, user_id, team, closed, buyback, status, modified";

pub(crate) fn row_to_pick(row: &Row) -> rusqlite::Result<Pick> {
    let status: i64 = row.get(6)?;
    Ok(Pick {
        week: Week::new(row.get(0)?),
        entry_id: EntryId::new(row.get(1)?),
        user_id: UserId::new(row.get(2)?),
        team: row.get::<_, Option<u16>>(3)?.map(TeamId::new),
        closed: row.get(4)?,
        buyback: row.get(5)?,
        status: PickStatus::from_i64(status).unwrap_or(PickStatus::Pending),
        modified: row.get(7)?,
    })
}
