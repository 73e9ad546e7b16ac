use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Record, Searchable};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct League {
    pub id: i64,
    pub name: String,
    pub year: String,
    pub season: String,
    #[serde(rename = "startDate")]
    pub start_date: DateTime<Utc>,
    #[serde(rename = "endDate")]
    pub end_date: DateTime<Utc>,
}

impl League {
    /// Short label for pickers and list rows, e.g. "Premier 2025 (summer)".
    pub fn display_label(&self) -> String {
        format!("{} {} ({})", self.name, self.year, self.season)
    }
}

impl Record for League {
    fn record_id(&self) -> i64 {
        self.id
    }
}

impl Searchable for League {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name]
    }
}

/// Write payload for create-league / update-league.
#[derive(Debug, Clone, Serialize)]
pub struct LeagueDraft {
    pub name: String,
    pub year: String,
    pub season: String,
    #[serde(rename = "startDate")]
    pub start_date: DateTime<Utc>,
    #[serde(rename = "endDate")]
    pub end_date: DateTime<Utc>,
}

/// `get-leagues` wraps the collection; `get-league/{id}` returns the
/// record bare. Both shapes live here so the client stays thin.
#[derive(Debug, Deserialize)]
pub struct LeaguesResponse {
    pub leagues: Vec<League>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    #[serde(rename = "leagueId")]
    pub league_id: i64,
}

impl Record for Group {
    fn record_id(&self) -> i64 {
        self.id
    }
}

impl Searchable for Group {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupDraft {
    pub name: String,
    #[serde(rename = "leagueId")]
    pub league_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct GroupsResponse {
    pub groups: Vec<Group>,
}

/// `get-group/{id}` wraps the single record.
#[derive(Debug, Deserialize)]
pub struct GroupWrapper {
    pub group: Group,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leagues_response() {
        let json = r#"{"leagues":[{"id":3,"name":"Premier","year":"2025","season":"summer",
            "startDate":"2025-06-01T00:00:00.000Z","endDate":"2025-08-31T00:00:00.000Z"}]}"#;
        let parsed: LeaguesResponse = serde_json::from_str(json).expect("parse leagues");
        assert_eq!(parsed.leagues.len(), 1);
        assert_eq!(parsed.leagues[0].id, 3);
        assert_eq!(parsed.leagues[0].display_label(), "Premier 2025 (summer)");
    }

    #[test]
    fn test_parse_rejects_missing_id() {
        let json = r#"{"name":"Premier","year":"2025","season":"summer",
            "startDate":"2025-06-01T00:00:00.000Z","endDate":"2025-08-31T00:00:00.000Z"}"#;
        assert!(serde_json::from_str::<League>(json).is_err());
    }

    #[test]
    fn test_league_draft_serializes_camel_case() {
        let draft = LeagueDraft {
            name: "Premier".into(),
            year: "2025".into(),
            season: "summer".into(),
            start_date: "2025-06-01T00:00:00Z".parse().expect("date"),
            end_date: "2025-08-31T00:00:00Z".parse().expect("date"),
        };
        let json = serde_json::to_value(&draft).expect("serialize draft");
        assert!(json.get("startDate").is_some());
        assert!(json.get("endDate").is_some());
    }

    #[test]
    fn test_parse_group_wrapper() {
        let json = r#"{"group":{"id":7,"name":"Group A","leagueId":3}}"#;
        let parsed: GroupWrapper = serde_json::from_str(json).expect("parse group");
        assert_eq!(parsed.group.league_id, 3);
    }
}
