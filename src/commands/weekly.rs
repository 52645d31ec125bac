//! Weekly process command implementations

use super::{open_db, resolve_week};
use crate::cli::types::{TeamId, Week};
use crate::lifecycle;
use crate::tasks;
use std::collections::HashSet;

/// Handle the week close command
pub fn handle_close(week: Option<Week>, restrict_to_teams: Vec<TeamId>) -> anyhow::Result<()> {
    let mut db = open_db()?;
    let week = resolve_week(&db, week)?;
    let restrict: Option<HashSet<TeamId>> = if restrict_to_teams.is_empty() {
        None
    } else {
        Some(restrict_to_teams.into_iter().collect())
    };
    let closed = lifecycle::close_picks(&mut db, week, restrict.as_ref())?;
    println!("✓ Closed {closed} picks for week {week}");
    Ok(())
}

/// Handle the week propagate command
pub fn handle_propagate(week: Option<Week>) -> anyhow::Result<()> {
    let mut db = open_db()?;
    let week = resolve_week(&db, week)?;
    let (wins, losses) = lifecycle::set_pick_status(&mut db, week, None)?;
    println!("✓ Week {week}: {wins} winning picks, {losses} losing picks");
    if !db.week_complete(week)? {
        println!("⚠ Week {week} still has undecided games; re-run after they finish");
    }
    Ok(())
}

/// Handle the week reconcile command.
///
/// Deferred auto-naming runs on a worker with its own database connection;
/// the command waits for the queue to drain before reporting.
pub async fn handle_reconcile(week: Option<Week>) -> anyhow::Result<()> {
    let mut db = open_db()?;
    let week = resolve_week(&db, week)?;
    let worker_db = open_db()?;

    let (queue, rx) = tasks::channel();
    let worker = tokio::spawn(tasks::run_worker(rx, worker_db, tasks::DEFAULT_MAX_ATTEMPTS));

    let alive = lifecycle::deactivate_dead_entries(&mut db, &queue, week)?;
    drop(queue);
    worker.await?;

    println!("✓ Week {week} reconciled; {} entries remain alive", alive.len());
    for entry in alive {
        println!(
            "  #{} {}",
            entry.entry_id,
            entry.name.as_deref().unwrap_or("(unnamed)")
        );
    }
    Ok(())
}

/// Handle the week create-picks command
pub fn handle_create_picks(week: Option<Week>) -> anyhow::Result<()> {
    let mut db = open_db()?;
    let week = resolve_week(&db, week)?;
    let alive = db.alive_entries()?;
    let created = lifecycle::create_picks(&mut db, week, &alive)?;
    println!("✓ Created {created} picks for week {week}");
    Ok(())
}
