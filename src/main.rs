//! Entry point: parse CLI and dispatch to command handlers.

use clap::Parser;
use survivor_pool::{
    cli::{Commands, EntryCmd, GameCmd, SurvivorPool, UserCmd, WeekCmd},
    commands::{
        entries::{handle_buyback, handle_entry_add, handle_entry_name, handle_pick, handle_user_add},
        games::{handle_game_add, handle_game_list, handle_game_reset, handle_game_result},
        standings::{handle_history, handle_standings},
        weekly::{handle_close, handle_create_picks, handle_propagate, handle_reconcile},
    },
    notify::LogNotifier,
};
use tracing_subscriber::EnvFilter;

/// Run the CLI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let app = SurvivorPool::parse();

    match app.command {
        Commands::User { cmd } => match cmd {
            UserCmd::Add { name, email } => handle_user_add(name, email)?,
        },

        Commands::Entry { cmd } => match cmd {
            EntryCmd::Add { user } => handle_entry_add(user)?,
            EntryCmd::Name { entry, name, week } => handle_entry_name(entry, name, week)?,
            EntryCmd::Buyback { entry } => {
                let mut notifier = LogNotifier;
                handle_buyback(entry, &mut notifier)?
            }
        },

        Commands::Pick { entry, week, team } => handle_pick(entry, week, team)?,

        Commands::Week { cmd } => match cmd {
            WeekCmd::Close { week, team } => handle_close(week, team)?,
            WeekCmd::Propagate { week } => handle_propagate(week)?,
            WeekCmd::Reconcile { week } => handle_reconcile(week).await?,
            WeekCmd::CreatePicks { week } => handle_create_picks(week)?,
        },

        Commands::Game { cmd } => match cmd {
            GameCmd::Add {
                week,
                home,
                visiting,
                kickoff,
            } => handle_game_add(week, home, visiting, kickoff)?,
            GameCmd::Result {
                game,
                home_score,
                visiting_score,
            } => handle_game_result(game, home_score, visiting_score)?,
            GameCmd::List { week } => handle_game_list(week)?,
            GameCmd::Reset => handle_game_reset()?,
        },

        Commands::Standings { week, json } => handle_standings(week, json)?,

        Commands::History { page_size } => handle_history(page_size)?,
    }

    Ok(())
}
