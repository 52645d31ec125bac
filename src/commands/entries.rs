//! User, entry and pick command implementations

use super::{open_db, resolve_week};
use crate::cli::types::{EntryId, TeamId, UserId, Week};
use crate::lifecycle;
use crate::notify::NotificationSink;
use crate::teams;

/// Handle the user add command
pub fn handle_user_add(name: String, email: Option<String>) -> anyhow::Result<()> {
    let mut db = open_db()?;
    let user = db.add_user(&name, email.as_deref())?;
    println!("✓ User {} registered as #{}", user.name, user.user_id);
    Ok(())
}

/// Handle the entry add command
pub fn handle_entry_add(user: UserId) -> anyhow::Result<()> {
    let mut db = open_db()?;
    // surface a bad user id here instead of at first naming
    db.user(user)?;
    let entry = db.create_entry(user)?;
    println!("✓ Entry #{} created for user {}", entry.entry_id, user);
    Ok(())
}

/// Handle the entry name command
pub fn handle_entry_name(entry: EntryId, name: String, week: Option<Week>) -> anyhow::Result<()> {
    let mut db = open_db()?;
    let week = resolve_week(&db, week)?;
    let pick = lifecycle::name_entry(&mut db, entry, &name, week)?;
    println!(
        "✓ Entry #{} named \"{}\", pick open for week {}",
        entry, name, pick.week
    );
    Ok(())
}

/// Handle the entry buyback command
pub fn handle_buyback<N: NotificationSink>(
    entry: EntryId,
    notifier: &mut N,
) -> anyhow::Result<()> {
    let mut db = open_db()?;
    match lifecycle::buyback_entry(&mut db, entry, chrono::Utc::now())? {
        Some(user_id) => {
            notifier.send_buyback_confirmation(user_id)?;
            println!("✓ Entry #{entry} bought back; confirmation sent to user {user_id}");
        }
        None => {
            println!("✓ Entry #{entry} bought back");
        }
    }
    Ok(())
}

/// Handle the pick command
pub fn handle_pick(entry: EntryId, week: Option<Week>, team: TeamId) -> anyhow::Result<()> {
    let mut db = open_db()?;
    let week = resolve_week(&db, week)?;
    db.select_team(entry, week, team)?;
    println!(
        "✓ Entry #{} picked {} for week {}",
        entry,
        teams::fullname(team),
        week
    );
    Ok(())
}
