//! Data models for the league administration backend.
//!
//! This module contains the typed shapes of every resource the backend
//! serves, plus the write-side payloads:
//!
//! - `League`, `Group`: competition structure
//! - `Team`, `Player`: roster data
//! - `Match`: fixtures with embedded home/away/league references
//! - `User`: staff accounts
//!
//! Payloads are parsed into these types at the network boundary so
//! malformed responses are rejected there instead of downstream.

pub mod fixture;
pub mod league;
pub mod team;
pub mod user;

pub use fixture::{LeagueRef, Match, MatchDraft, MatchStatus, MatchesResponse, TeamRef};
pub use league::{
    Group, GroupDraft, GroupWrapper, GroupsResponse, League, LeagueDraft, LeaguesResponse,
};
pub use team::{Player, PlayerDraft, PlayersResponse, Team, TeamDraft, TeamWrapper, TeamsResponse};
pub use user::{User, UserDraft, UsersResponse};

/// Identity used for optimistic cache filtering. The cache assumes
/// nothing else about a record's shape.
pub trait Record {
    fn record_id(&self) -> i64;
}

/// Text fields a record can be searched on, in display order.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}
