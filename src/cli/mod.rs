//! CLI argument definitions and parsing.

pub mod types;

use clap::{Parser, Subcommand};
use types::{EntryId, GameId, TeamId, UserId, Week};

#[derive(Debug, Parser)]
#[clap(name = "survivor-pool", about = "Weekly elimination pool manager")]
pub struct SurvivorPool {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage pool users
    User {
        #[clap(subcommand)]
        cmd: UserCmd,
    },

    /// Manage pool entries
    Entry {
        #[clap(subcommand)]
        cmd: EntryCmd,
    },

    /// Select a team for an entry's weekly pick
    Pick {
        /// Entry making the pick.
        #[clap(long, short)]
        entry: EntryId,

        /// Week number; defaults to the week currently in play.
        #[clap(long, short)]
        week: Option<Week>,

        /// Team to win, by abbreviation (`CHI`) or id.
        #[clap(long, short)]
        team: TeamId,
    },

    /// Weekly administrative processes, intended to run on a schedule
    Week {
        #[clap(subcommand)]
        cmd: WeekCmd,
    },

    /// Manage the game schedule and results
    Game {
        #[clap(subcommand)]
        cmd: GameCmd,
    },

    /// Show standings: alive entries and per-week pick counts
    Standings {
        /// Week to summarize; defaults to the week currently in play.
        #[clap(long, short)]
        week: Option<Week>,

        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// List every closed pick, paging through the full ledger
    History {
        /// Picks fetched per page.
        #[clap(long, default_value_t = 100)]
        page_size: usize,
    },
}

#[derive(Debug, Subcommand)]
pub enum UserCmd {
    /// Register a user
    Add {
        /// Display name, e.g. "Pat Jones".
        #[clap(long, short)]
        name: String,

        /// Email address for notifications.
        #[clap(long, short)]
        email: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum EntryCmd {
    /// Register a new (unnamed) entry slot for a user
    Add {
        /// Owning user.
        #[clap(long, short)]
        user: UserId,
    },

    /// Name an entry, activating it and creating its pick for the week
    Name {
        /// Entry to name.
        #[clap(long, short)]
        entry: EntryId,

        /// Display name, unique pool-wide.
        #[clap(long, short)]
        name: String,

        /// Week for the entry's first pick; defaults to the week
        /// currently in play.
        #[clap(long, short)]
        week: Option<Week>,
    },

    /// Buy a dead entry back into the pool
    Buyback {
        /// Entry to reactivate.
        #[clap(long, short)]
        entry: EntryId,
    },
}

#[derive(Debug, Subcommand)]
pub enum WeekCmd {
    /// Lock picks and flag violations.
    ///
    /// With `--team` arguments, closes only picks on those teams (that
    /// subset of games just kicked off); without them, closes the whole
    /// week.
    Close {
        /// Week to close; defaults to the week currently in play.
        #[clap(long, short)]
        week: Option<Week>,

        /// Restrict the close to picks on these teams (repeatable).
        #[clap(long, short)]
        team: Vec<TeamId>,
    },

    /// Apply game results to picks and cascade to entry alive/dead state
    Propagate {
        /// Week to propagate; defaults to the week currently in play.
        #[clap(long, short)]
        week: Option<Week>,
    },

    /// Deactivate entries with no pick this week and auto-name them
    Reconcile {
        /// Week to reconcile; defaults to the week currently in play.
        #[clap(long, short)]
        week: Option<Week>,
    },

    /// Create this week's picks for the surviving alive entries
    CreatePicks {
        /// Week to create picks for; defaults to the week currently in
        /// play.
        #[clap(long, short)]
        week: Option<Week>,
    },
}

#[derive(Debug, Subcommand)]
pub enum GameCmd {
    /// Add one scheduled matchup
    Add {
        /// Week number.
        #[clap(long, short)]
        week: Week,

        /// Home team.
        #[clap(long)]
        home: TeamId,

        /// Visiting team.
        #[clap(long)]
        visiting: TeamId,

        /// Kickoff time, RFC 3339 (e.g. 2026-09-13T17:00:00Z).
        #[clap(long, short)]
        kickoff: String,
    },

    /// Record a final score
    Result {
        /// Game to update.
        #[clap(long, short)]
        game: GameId,

        /// Home team final score.
        #[clap(long)]
        home_score: u32,

        /// Visiting team final score.
        #[clap(long)]
        visiting_score: u32,
    },

    /// List a week's games
    List {
        /// Week number; defaults to the week currently in play.
        #[clap(long, short)]
        week: Option<Week>,
    },

    /// Delete the entire schedule (full season reset)
    Reset,
}
