use serde::{Deserialize, Serialize};

use super::{Record, Searchable};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    #[serde(rename = "leagueId")]
    pub league_id: i64,
    #[serde(rename = "groupId")]
    pub group_id: i64,
}

impl Record for Team {
    fn record_id(&self) -> i64 {
        self.id
    }
}

impl Searchable for Team {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamDraft {
    pub name: String,
    #[serde(rename = "leagueId")]
    pub league_id: i64,
    #[serde(rename = "groupId")]
    pub group_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct TeamsResponse {
    pub teams: Vec<Team>,
}

/// `get-team/{id}` wraps the single record.
#[derive(Debug, Deserialize)]
pub struct TeamWrapper {
    pub team: Team,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub number: i32,
    pub position: String,
    #[serde(rename = "teamId")]
    pub team_id: i64,
}

impl Player {
    /// Squad-sheet style label, e.g. "#9 Saka (RW)".
    pub fn display_label(&self) -> String {
        format!("#{} {} ({})", self.number, self.name, self.position)
    }
}

impl Record for Player {
    fn record_id(&self) -> i64 {
        self.id
    }
}

impl Searchable for Player {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerDraft {
    pub name: String,
    pub number: i32,
    pub position: String,
    #[serde(rename = "teamId")]
    pub team_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct PlayersResponse {
    pub players: Vec<Player>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_team_wrapper() {
        let json = r#"{"team":{"id":4,"name":"Arsenal","leagueId":3,"groupId":7}}"#;
        let parsed: TeamWrapper = serde_json::from_str(json).expect("parse team");
        assert_eq!(parsed.team.name, "Arsenal");
        assert_eq!(parsed.team.group_id, 7);
    }

    #[test]
    fn test_player_display_label() {
        let player = Player {
            id: 1,
            name: "Saka".into(),
            number: 7,
            position: "RW".into(),
            team_id: 4,
        };
        assert_eq!(player.display_label(), "#7 Saka (RW)");
    }

    #[test]
    fn test_team_draft_serializes_camel_case() {
        let draft = TeamDraft {
            name: "Arsenal".into(),
            league_id: 3,
            group_id: 7,
        };
        let json = serde_json::to_value(&draft).expect("serialize draft");
        assert_eq!(json.get("leagueId").and_then(|v| v.as_i64()), Some(3));
        assert_eq!(json.get("groupId").and_then(|v| v.as_i64()), Some(7));
    }
}
