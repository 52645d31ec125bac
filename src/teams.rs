//! Static team directory.
//!
//! Maps team ids to names and abbreviations. The directory is fixed for a
//! season; schedule and score data reference teams only by id.

use crate::cli::types::TeamId;

/// Static metadata for one team.
#[derive(Debug, Clone, Copy)]
pub struct TeamInfo {
    pub id: TeamId,
    pub city: &'static str,
    pub mascot: &'static str,
    pub abbrev: &'static str,
}

const fn team(id: u16, city: &'static str, mascot: &'static str, abbrev: &'static str) -> TeamInfo {
    TeamInfo {
        id: TeamId(id),
        city,
        mascot,
        abbrev,
    }
}

const TEAMS: [TeamInfo; 32] = [
    team(1, "Arizona", "Cardinals", "ARI"),
    team(2, "Atlanta", "Falcons", "ATL"),
    team(3, "Baltimore", "Ravens", "BAL"),
    team(4, "Buffalo", "Bills", "BUF"),
    team(5, "Carolina", "Panthers", "CAR"),
    team(6, "Chicago", "Bears", "CHI"),
    team(7, "Cincinnati", "Bengals", "CIN"),
    team(8, "Cleveland", "Browns", "CLE"),
    team(9, "Dallas", "Cowboys", "DAL"),
    team(10, "Denver", "Broncos", "DEN"),
    team(11, "Detroit", "Lions", "DET"),
    team(12, "Green Bay", "Packers", "GB"),
    team(13, "Houston", "Texans", "HOU"),
    team(14, "Indianapolis", "Colts", "IND"),
    team(15, "Jacksonville", "Jaguars", "JAX"),
    team(16, "Kansas City", "Chiefs", "KC"),
    team(17, "Las Vegas", "Raiders", "LV"),
    team(18, "Los Angeles", "Chargers", "LAC"),
    team(19, "Los Angeles", "Rams", "LAR"),
    team(20, "Miami", "Dolphins", "MIA"),
    team(21, "Minnesota", "Vikings", "MIN"),
    team(22, "New England", "Patriots", "NE"),
    team(23, "New Orleans", "Saints", "NO"),
    team(24, "New York", "Giants", "NYG"),
    team(25, "New York", "Jets", "NYJ"),
    team(26, "Philadelphia", "Eagles", "PHI"),
    team(27, "Pittsburgh", "Steelers", "PIT"),
    team(28, "San Francisco", "49ers", "SF"),
    team(29, "Seattle", "Seahawks", "SEA"),
    team(30, "Tampa Bay", "Buccaneers", "TB"),
    team(31, "Tennessee", "Titans", "TEN"),
    team(32, "Washington", "Commanders", "WAS"),
];

/// All teams in id order.
pub fn all() -> &'static [TeamInfo] {
    &TEAMS
}

/// Metadata for a team id, if it exists.
pub fn info(id: TeamId) -> Option<&'static TeamInfo> {
    let idx = id.as_u16().checked_sub(1)? as usize;
    TEAMS.get(idx)
}

/// "City Mascot" for display, or a placeholder for an unknown id.
pub fn fullname(id: TeamId) -> String {
    match info(id) {
        Some(t) => format!("{} {}", t.city, t.mascot),
        None => format!("Unknown ({})", id),
    }
}

/// Team abbreviation, or "???" for an unknown id.
pub fn shortname(id: TeamId) -> &'static str {
    info(id).map(|t| t.abbrev).unwrap_or("???")
}

/// Team city, or "???" for an unknown id.
pub fn city(id: TeamId) -> &'static str {
    info(id).map(|t| t.city).unwrap_or("???")
}

/// Team mascot, or "???" for an unknown id.
pub fn mascot(id: TeamId) -> &'static str {
    info(id).map(|t| t.mascot).unwrap_or("???")
}

/// Look up a team by its abbreviation, case-insensitive.
pub fn by_abbrev(abbrev: &str) -> Option<TeamId> {
    TEAMS
        .iter()
        .find(|t| t.abbrev.eq_ignore_ascii_case(abbrev))
        .map(|t| t.id)
}
