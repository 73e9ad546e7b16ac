use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Record, Searchable};

/// Embedded team reference as the backend returns it inside a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: i64,
    pub name: String,
}

/// Embedded league reference inside a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueRef {
    pub id: i64,
    pub name: String,
}

/// Live state of a fixture. `Completed` is terminal: the backend stops
/// accepting status and score edits once a match is completed, and the
/// UI disables its controls off `is_final`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchStatus {
    Live,
    Pause,
    Postponed,
    Completed,
}

impl MatchStatus {
    pub fn is_final(&self) -> bool {
        *self == MatchStatus::Completed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: i64,
    #[serde(rename = "dateTime")]
    pub kickoff: DateTime<Utc>,
    pub home: TeamRef,
    pub away: TeamRef,
    pub league: LeagueRef,
    pub status: MatchStatus,
    #[serde(rename = "scoreTeamOne")]
    pub score_home: i32,
    #[serde(rename = "scoreTeamTwo")]
    pub score_away: i32,
}

impl Match {
    /// Fixture line as shown in list rows, e.g. "Arsenal vs Chelsea".
    pub fn display_label(&self) -> String {
        format!("{} vs {}", self.home.name, self.away.name)
    }

    /// Scoreboard line, e.g. "Arsenal 2 - 1 Chelsea".
    pub fn score_line(&self) -> String {
        format!(
            "{} {} - {} {}",
            self.home.name, self.score_home, self.score_away, self.away.name
        )
    }
}

impl Record for Match {
    fn record_id(&self) -> i64 {
        self.id
    }
}

impl Searchable for Match {
    // Match search spans both team names and the league name.
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.home.name, &self.away.name, &self.league.name]
    }
}

/// Write payload for create-match / update-match. The backend resolves
/// the id references into the embedded objects on read.
#[derive(Debug, Clone, Serialize)]
pub struct MatchDraft {
    #[serde(rename = "homeId")]
    pub home_id: i64,
    #[serde(rename = "awayId")]
    pub away_id: i64,
    #[serde(rename = "leagueId")]
    pub league_id: i64,
    #[serde(rename = "dateTime")]
    pub kickoff: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct MatchesResponse {
    pub matches: Vec<Match>,
}
