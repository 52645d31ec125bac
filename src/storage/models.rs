//! Data models for the storage layer

use crate::cli::types::{EntryId, GameId, TeamId, UserId, Week};
use crate::teams;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One elimination-pool slot owned by a user.
///
/// An entry starts unnamed (`name == None`); it is named lazily the first
/// time a pick is made for it. `alive` flips false on elimination and may
/// flip true again only through a buyback. Entries are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub entry_id: EntryId,
    pub user_id: UserId,
    pub name: Option<String>,
    pub alive: bool,
}

impl Entry {
    /// An entry is activated once it has been named.
    pub fn activated(&self) -> bool {
        self.name.is_some()
    }
}

/// Outcome status of a pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickStatus {
    /// No result applied yet.
    Pending,
    Win,
    Loss,
    /// Disqualifying pick: no selection at the deadline, or a re-used
    /// winning team. Set at closing time and never overwritten.
    Violation,
}

impl PickStatus {
    pub fn as_i64(self) -> i64 {
        match self {
            PickStatus::Pending => 0,
            PickStatus::Win => 1,
            PickStatus::Loss => 2,
            PickStatus::Violation => 3,
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(PickStatus::Pending),
            1 => Some(PickStatus::Win),
            2 => Some(PickStatus::Loss),
            3 => Some(PickStatus::Violation),
            _ => None,
        }
    }
}

impl fmt::Display for PickStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PickStatus::Pending => "pending",
            PickStatus::Win => "win",
            PickStatus::Loss => "loss",
            PickStatus::Violation => "violation",
        };
        write!(f, "{s}")
    }
}

/// One entry's team selection for one week.
///
/// Identity key is `(week, entry_id)`; at most one pick per entry per week.
/// `team == None` is the "no selection" sentinel. Once `closed` is set the
/// team and status are immutable through the normal selection path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pick {
    pub entry_id: EntryId,
    /// Denormalized from the owning entry for per-user week queries.
    pub user_id: UserId,
    pub week: Week,
    pub team: Option<TeamId>,
    pub closed: bool,
    /// Marks this week's pick as a buyback reactivation.
    pub buyback: bool,
    pub status: PickStatus,
    /// Unix seconds; bumped on every write.
    pub modified: i64,
}

impl Pick {
    pub fn team_fullname(&self) -> Option<String> {
        self.team.map(teams::fullname)
    }

    pub fn team_shortname(&self) -> Option<&'static str> {
        self.team.map(teams::shortname)
    }
}

/// Resume point for the paginated scan over closed picks.
///
/// Deliberately a composite value rather than a formatted string; ordering
/// matches the scan order `(entry_id, week)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickCursor {
    pub entry_id: EntryId,
    pub week: Week,
}

impl PickCursor {
    pub fn after(pick: &Pick) -> Self {
        Self {
            entry_id: pick.entry_id,
            week: pick.week,
        }
    }
}

/// One scheduled matchup.
///
/// Scores are `None` until the game has been played; `winner` is set only
/// when both scores are known and distinct, so a tie leaves it undetermined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub game_id: GameId,
    pub week: Week,
    pub home: TeamId,
    pub visiting: TeamId,
    pub kickoff: chrono::DateTime<chrono::Utc>,
    pub home_score: Option<u32>,
    pub visiting_score: Option<u32>,
    pub winner: Option<TeamId>,
}

impl Game {
    pub fn complete(&self) -> bool {
        self.winner.is_some()
    }
}

/// Pool user, the owner of one or more entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub name: String,
    pub email: Option<String>,
}
