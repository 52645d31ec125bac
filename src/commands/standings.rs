//! Standings and history command implementations

use super::{open_db, resolve_week};
use crate::cli::types::Week;
use crate::storage::{PickCursor, PickStatus, PoolDatabase};
use crate::teams;
use serde::Serialize;

/// One alive entry's line in the standings.
#[derive(Debug, Serialize)]
pub(crate) struct StandingsLine {
    pub(crate) entry_id: i64,
    pub(crate) user_id: i64,
    pub(crate) name: Option<String>,
    pub(crate) team: Option<String>,
    pub(crate) status: Option<String>,
}

/// Week summary for the standings view.
#[derive(Debug, Serialize)]
pub(crate) struct StandingsReport {
    pub(crate) week: u16,
    pub(crate) alive: Vec<StandingsLine>,
    pub(crate) violations: usize,
    pub(crate) no_pick: usize,
    pub(crate) all_closed: bool,
    pub(crate) all_resolved: bool,
}

pub(crate) fn build_report(db: &PoolDatabase, week: Week) -> anyhow::Result<StandingsReport> {
    let picks = db.picks_for_week(week)?;
    let mut alive = Vec::new();
    for entry in db.alive_entries()? {
        let pick = picks.get(&entry.entry_id);
        alive.push(StandingsLine {
            entry_id: entry.entry_id.as_i64(),
            user_id: entry.user_id.as_i64(),
            name: entry.name,
            team: pick.and_then(|p| p.team).map(teams::fullname),
            status: pick.map(|p| p.status.to_string()),
        });
    }
    Ok(StandingsReport {
        week: week.as_u16(),
        alive,
        violations: db.violation_count(week)?,
        no_pick: db.no_pick_count(week)?,
        all_closed: db.picks_closed(week)?,
        all_resolved: db.picks_resolved(week)?,
    })
}

/// Handle the standings command
pub fn handle_standings(week: Option<Week>, as_json: bool) -> anyhow::Result<()> {
    let db = open_db()?;
    let week = resolve_week(&db, week)?;
    let report = build_report(&db, week)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Week {} — {} entries alive", report.week, report.alive.len());
    for line in &report.alive {
        println!(
            "  #{} {} — {} [{}]",
            line.entry_id,
            line.name.as_deref().unwrap_or("(unnamed)"),
            line.team.as_deref().unwrap_or("no pick"),
            line.status.as_deref().unwrap_or("no pick"),
        );
    }
    println!(
        "violations: {}, without a selection: {}",
        report.violations, report.no_pick
    );
    if !report.all_closed {
        println!("⚠ some picks are still open");
    } else if !report.all_resolved {
        println!("⚠ some picks are still pending results");
    }

    // team popularity, most picked first
    let mut counts: Vec<_> = db.team_counts(week)?.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    for (team, count) in counts {
        let label = team.map(teams::fullname).unwrap_or_else(|| "no selection".to_string());
        println!("  {count:>3} × {label}");
    }
    Ok(())
}

/// Handle the history command: page through every closed pick with the
/// restartable cursor scan.
pub fn handle_history(page_size: usize) -> anyhow::Result<()> {
    let db = open_db()?;
    let mut cursor: Option<PickCursor> = None;
    let mut total = 0usize;
    loop {
        let page = db.closed_picks_page(cursor, page_size)?;
        let Some(last) = page.last() else { break };
        cursor = Some(PickCursor::after(last));
        for pick in &page {
            let marker = match pick.status {
                PickStatus::Violation => " VIOLATION",
                PickStatus::Win => " win",
                PickStatus::Loss => " loss",
                PickStatus::Pending => "",
            };
            println!(
                "entry #{} week {}: {}{}{}",
                pick.entry_id,
                pick.week,
                pick.team_shortname().unwrap_or("—"),
                marker,
                if pick.buyback { " (buyback)" } else { "" },
            );
        }
        total += page.len();
        if page.len() < page_size {
            break;
        }
    }
    println!("{total} closed picks");
    Ok(())
}
