//! `AdminService`: the handle every screen works through.
//!
//! Owns the API client, the per-collection query caches and the
//! persisted session. Reads go through the cache; mutations follow the
//! optimistic-delete / invalidate-on-write protocol and always resolve
//! into a `Notice` the UI can toast, never a bubbled error.

use std::future::Future;
use std::sync::{Mutex, MutexGuard};

use futures::FutureExt;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::{CredentialStore, Session, SessionData, StartRoute};
use crate::cache::{FetchError, QueryCache};
use crate::config::Config;
use crate::models::{
    Group, GroupDraft, League, LeagueDraft, Match, MatchDraft, MatchStatus, Player, PlayerDraft,
    Record, Team, TeamDraft, User, UserDraft,
};
use crate::notice::Notice;
use crate::utils::validate::{is_valid_email, is_valid_name, is_valid_password, MIN_NAME_CHARS, MIN_PASSWORD_CHARS};

/// Proof that the user answered yes to a delete prompt. Deletes cannot
/// be issued without one, and `confirm(false)` never produces one, so a
/// declined prompt performs no cache or network action at all.
pub struct Confirmed(());

pub fn confirm(answer: bool) -> Option<Confirmed> {
    answer.then_some(Confirmed(()))
}

fn fetch_error(err: ApiError) -> FetchError {
    FetchError::new(err.to_string())
}

pub struct AdminService {
    api: Mutex<ApiClient>,
    session: Mutex<Session>,
    pub leagues: QueryCache<(), Vec<League>>,
    pub groups: QueryCache<(), Vec<Group>>,
    pub teams: QueryCache<(), Vec<Team>>,
    pub players: QueryCache<(), Vec<Player>>,
    pub matches: QueryCache<(), Vec<Match>>,
    pub users: QueryCache<(), Vec<User>>,
    pub league_details: QueryCache<i64, League>,
    pub match_details: QueryCache<i64, Match>,
}

impl AdminService {
    pub fn new(api: ApiClient, session: Session) -> Self {
        Self {
            api: Mutex::new(api),
            session: Mutex::new(session),
            leagues: QueryCache::new(),
            groups: QueryCache::new(),
            teams: QueryCache::new(),
            players: QueryCache::new(),
            matches: QueryCache::new(),
            users: QueryCache::new(),
            league_details: QueryCache::new(),
            match_details: QueryCache::new(),
        }
    }

    /// Build a service from persisted configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api = ApiClient::new(config.api_base_url())?;
        let session = Session::new(config.cache_dir()?);
        Ok(Self::new(api, session))
    }

    fn api(&self) -> ApiClient {
        self.api.lock().expect("api mutex poisoned").clone()
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().expect("session mutex poisoned")
    }

    // ===== Startup =====

    /// Load the persisted session, attach its token to the client, and
    /// report where the app should land.
    pub fn restore_session(&self) -> StartRoute {
        let mut session = self.session();
        match session.load() {
            Ok(true) => {
                if let Some(token) = session.token() {
                    self.api
                        .lock()
                        .expect("api mutex poisoned")
                        .set_token(token.to_string());
                }
            }
            Ok(false) => {}
            Err(err) => {
                warn!(error = %err, "could not restore session");
            }
        }
        session.start_route()
    }

    // ===== Reads =====

    pub async fn leagues(&self) -> Result<Vec<League>, FetchError> {
        let api = self.api();
        self.leagues
            .fetch_with((), move || {
                async move { api.list_leagues().await.map_err(fetch_error) }.boxed()
            })
            .await
    }

    pub async fn groups(&self) -> Result<Vec<Group>, FetchError> {
        let api = self.api();
        self.groups
            .fetch_with((), move || {
                async move { api.list_groups().await.map_err(fetch_error) }.boxed()
            })
            .await
    }

    pub async fn teams(&self) -> Result<Vec<Team>, FetchError> {
        let api = self.api();
        self.teams
            .fetch_with((), move || {
                async move { api.list_teams().await.map_err(fetch_error) }.boxed()
            })
            .await
    }

    pub async fn players(&self) -> Result<Vec<Player>, FetchError> {
        let api = self.api();
        self.players
            .fetch_with((), move || {
                async move { api.list_players().await.map_err(fetch_error) }.boxed()
            })
            .await
    }

    pub async fn matches(&self) -> Result<Vec<Match>, FetchError> {
        let api = self.api();
        self.matches
            .fetch_with((), move || {
                async move { api.list_matches().await.map_err(fetch_error) }.boxed()
            })
            .await
    }

    pub async fn users(&self) -> Result<Vec<User>, FetchError> {
        let api = self.api();
        self.users
            .fetch_with((), move || {
                async move { api.list_users().await.map_err(fetch_error) }.boxed()
            })
            .await
    }

    pub async fn league_by_id(&self, id: i64) -> Result<League, FetchError> {
        let api = self.api();
        self.league_details
            .fetch_with(id, move || {
                async move { api.get_league(id).await.map_err(fetch_error) }.boxed()
            })
            .await
    }

    pub async fn match_by_id(&self, id: i64) -> Result<Match, FetchError> {
        let api = self.api();
        self.match_details
            .fetch_with(id, move || {
                async move { api.get_match(id).await.map_err(fetch_error) }.boxed()
            })
            .await
    }

    /// Profile of the logged-in account. Not cached: the profile screen
    /// reads it once per visit and the token resolves it server-side.
    pub async fn profile(&self) -> Result<User, ApiError> {
        let token = match self.session().token() {
            Some(token) => token.to_string(),
            None => return Err(ApiError::Unauthorized),
        };
        self.api().user_profile(&token).await
    }

    // ===== Optimistic deletes =====

    /// The delete protocol, shared by every collection: snapshot,
    /// optimistically drop the record by id, fire the request; success
    /// invalidates the key for an eventual refetch, failure restores
    /// the snapshot exactly.
    async fn delete_record<T, Fut>(
        cache: &QueryCache<(), Vec<T>>,
        id: i64,
        request: Fut,
        noun: &str,
    ) -> Notice
    where
        T: Record + Clone,
        Fut: Future<Output = Result<(), ApiError>>,
    {
        let snapshot = cache.snapshot(&());
        cache.apply(&(), |items| items.retain(|item| item.record_id() != id));

        match request.await {
            Ok(()) => {
                cache.invalidate(&());
                info!(id, noun, "record deleted");
                Notice::success(format!("{} deleted successfully", noun))
            }
            Err(err) => {
                warn!(id, noun, error = %err, "delete failed, rolling back");
                cache.restore(&(), snapshot);
                Notice::error_with(format!("Error deleting {}", noun), err.user_message())
            }
        }
    }

    pub async fn delete_league(&self, id: i64, _confirmed: Confirmed) -> Notice {
        let api = self.api();
        let notice = Self::delete_record(&self.leagues, id, api.delete_league(id), "League").await;
        if notice.is_success() {
            self.league_details.invalidate(&id);
        }
        notice
    }

    pub async fn delete_group(&self, id: i64, _confirmed: Confirmed) -> Notice {
        let api = self.api();
        Self::delete_record(&self.groups, id, api.delete_group(id), "Group").await
    }

    pub async fn delete_team(&self, id: i64, _confirmed: Confirmed) -> Notice {
        let api = self.api();
        Self::delete_record(&self.teams, id, api.delete_team(id), "Team").await
    }

    pub async fn delete_player(&self, id: i64, _confirmed: Confirmed) -> Notice {
        let api = self.api();
        Self::delete_record(&self.players, id, api.delete_player(id), "Player").await
    }

    pub async fn delete_match(&self, id: i64, _confirmed: Confirmed) -> Notice {
        let api = self.api();
        let notice = Self::delete_record(&self.matches, id, api.delete_match(id), "Match").await;
        if notice.is_success() {
            self.match_details.invalidate(&id);
        }
        notice
    }

    pub async fn delete_user(&self, id: i64, _confirmed: Confirmed) -> Notice {
        let api = self.api();
        Self::delete_record(&self.users, id, api.delete_user(id), "User").await
    }

    // ===== Creates / updates =====
    //
    // No optimistic pre-write here: submit, then invalidate the
    // affected key(s) so the next read reflects server state.

    fn required_fields_notice() -> Notice {
        Notice::error_with("Validation Error", "Please fill in all fields.")
    }

    pub async fn create_league(&self, draft: LeagueDraft) -> Notice {
        if draft.name.is_empty() || draft.year.is_empty() || draft.season.is_empty() {
            return Self::required_fields_notice();
        }
        match self.api().create_league(&draft).await {
            Ok(()) => {
                self.leagues.invalidate(&());
                Notice::success("League created successfully")
            }
            Err(err) => Notice::from_api_error("Failed to submit league", &err),
        }
    }

    pub async fn update_league(&self, id: i64, draft: LeagueDraft) -> Notice {
        if draft.name.is_empty() || draft.year.is_empty() || draft.season.is_empty() {
            return Self::required_fields_notice();
        }
        match self.api().update_league(id, &draft).await {
            Ok(()) => {
                self.leagues.invalidate(&());
                self.league_details.invalidate(&id);
                Notice::success("League updated successfully")
            }
            Err(err) => Notice::from_api_error("Failed to submit league", &err),
        }
    }

    pub async fn create_group(&self, draft: GroupDraft) -> Notice {
        if draft.name.is_empty() || draft.league_id <= 0 {
            return Self::required_fields_notice();
        }
        match self.api().create_group(&draft).await {
            Ok(()) => {
                self.groups.invalidate(&());
                Notice::success("Group created successfully")
            }
            Err(err) => Notice::from_api_error("Failed to submit group", &err),
        }
    }

    pub async fn update_group(&self, id: i64, draft: GroupDraft) -> Notice {
        if draft.name.is_empty() || draft.league_id <= 0 {
            return Self::required_fields_notice();
        }
        match self.api().update_group(id, &draft).await {
            Ok(()) => {
                self.groups.invalidate(&());
                Notice::success("Group updated successfully")
            }
            Err(err) => Notice::from_api_error("Failed to submit group", &err),
        }
    }

    pub async fn create_team(&self, draft: TeamDraft) -> Notice {
        if draft.name.is_empty() || draft.league_id <= 0 || draft.group_id <= 0 {
            return Self::required_fields_notice();
        }
        match self.api().create_team(&draft).await {
            Ok(()) => {
                self.teams.invalidate(&());
                Notice::success("Team created successfully")
            }
            Err(err) => Notice::from_api_error("Failed to submit team", &err),
        }
    }

    pub async fn update_team(&self, id: i64, draft: TeamDraft) -> Notice {
        if draft.name.is_empty() || draft.league_id <= 0 || draft.group_id <= 0 {
            return Self::required_fields_notice();
        }
        match self.api().update_team(id, &draft).await {
            Ok(()) => {
                self.teams.invalidate(&());
                Notice::success("Team updated successfully")
            }
            Err(err) => Notice::from_api_error("Failed to submit team", &err),
        }
    }

    pub async fn create_player(&self, draft: PlayerDraft) -> Notice {
        if draft.name.is_empty() || draft.position.is_empty() || draft.team_id <= 0 {
            return Self::required_fields_notice();
        }
        match self.api().create_player(&draft).await {
            Ok(()) => {
                self.players.invalidate(&());
                Notice::success_with(
                    "Player created successfully",
                    format!("{} has been added.", draft.name),
                )
            }
            Err(err) => Notice::from_api_error("Error creating player", &err),
        }
    }

    pub async fn update_player(&self, id: i64, draft: PlayerDraft) -> Notice {
        if draft.name.is_empty() || draft.position.is_empty() || draft.team_id <= 0 {
            return Self::required_fields_notice();
        }
        match self.api().update_player(id, &draft).await {
            Ok(()) => {
                self.players.invalidate(&());
                Notice::success("Player updated successfully")
            }
            Err(err) => Notice::from_api_error("Error updating player", &err),
        }
    }

    pub async fn create_match(&self, draft: MatchDraft) -> Notice {
        if draft.home_id <= 0 || draft.away_id <= 0 || draft.league_id <= 0 {
            return Self::required_fields_notice();
        }
        match self.api().create_match(&draft).await {
            Ok(()) => {
                self.matches.invalidate(&());
                Notice::success_with("Match created successfully", "Match has been created.")
            }
            Err(err) => Notice::from_api_error("Error creating match", &err),
        }
    }

    pub async fn update_match(&self, id: i64, draft: MatchDraft) -> Notice {
        if draft.home_id <= 0 || draft.away_id <= 0 || draft.league_id <= 0 {
            return Self::required_fields_notice();
        }
        match self.api().update_match(id, &draft).await {
            Ok(()) => {
                self.matches.invalidate(&());
                self.match_details.invalidate(&id);
                Notice::success("Match updated successfully")
            }
            Err(err) => Notice::from_api_error("Error updating match", &err),
        }
    }

    // ===== Livescore =====
    //
    // The points formula (win 3, draw 1, loss 0) runs where the match
    // result is decided; these methods only carry the outcome to the
    // backend and keep the affected keys fresh.

    pub async fn set_match_status(&self, id: i64, status: MatchStatus) -> Notice {
        match self.api().update_match_status(id, status).await {
            Ok(()) => {
                self.matches.invalidate(&());
                self.match_details.invalidate(&id);
                Notice::success("Match status updated")
            }
            Err(err) => Notice::from_api_error("Error updating match status", &err),
        }
    }

    pub async fn set_match_score(&self, id: i64, home: i32, away: i32) -> Notice {
        if home < 0 || away < 0 {
            return Notice::error("Scores cannot be negative.");
        }
        match self.api().update_match_score(id, home, away).await {
            Ok(()) => {
                self.matches.invalidate(&());
                self.match_details.invalidate(&id);
                Notice::success("Match score updated")
            }
            Err(err) => Notice::from_api_error("Error updating match score", &err),
        }
    }

    /// Credit standings points to a team. Invalidates the teams key so
    /// tables pick up the new totals on their next read.
    pub async fn add_team_points(&self, team_id: i64, points: i32) -> Notice {
        match self.api().add_points(team_id, points).await {
            Ok(()) => {
                self.teams.invalidate(&());
                Notice::success("Points added successfully")
            }
            Err(err) => Notice::from_api_error("Error adding points", &err),
        }
    }

    pub async fn create_user(&self, draft: UserDraft) -> Notice {
        if draft.name.is_empty() || draft.email.is_empty() || draft.password.is_empty() {
            return Self::required_fields_notice();
        }
        if !is_valid_name(&draft.name) {
            return Notice::error(format!(
                "Name must be at least {} characters long.",
                MIN_NAME_CHARS
            ));
        }
        if !is_valid_email(&draft.email) {
            return Notice::error("Please enter a valid email address.");
        }
        if !is_valid_password(&draft.password) {
            return Notice::error(format!(
                "Password must be at least {} characters long.",
                MIN_PASSWORD_CHARS
            ));
        }
        match self.api().register_user(&draft).await {
            Ok(()) => {
                self.users.invalidate(&());
                Notice::success_with(
                    "User created successfully",
                    format!("{} has been added.", draft.name),
                )
            }
            Err(err) => Notice::from_api_error("Error creating user", &err),
        }
    }

    pub async fn update_user(&self, id: i64, draft: UserDraft) -> Notice {
        if draft.name.is_empty() || draft.email.is_empty() {
            return Self::required_fields_notice();
        }
        match self.api().update_user(id, &draft).await {
            Ok(()) => {
                self.users.invalidate(&());
                Notice::success("User updated successfully")
            }
            Err(err) => Notice::from_api_error("Error updating user", &err),
        }
    }

    // ===== Auth =====

    /// Log in, persist the session and attach the token to the client.
    /// With `remember` set, credentials also go to the OS keychain to
    /// prefill the next login.
    pub async fn login(&self, email: &str, password: &str, remember: bool) -> Notice {
        if email.is_empty() || password.is_empty() {
            return Notice::error("Please fill in both email and password.");
        }
        if !is_valid_email(email) {
            return Notice::error("Please enter a valid email address.");
        }
        if !is_valid_password(password) {
            return Notice::error(format!(
                "Password must be at least {} characters long.",
                MIN_PASSWORD_CHARS
            ));
        }

        match self.api().login(email, password).await {
            Ok(token) => {
                self.api
                    .lock()
                    .expect("api mutex poisoned")
                    .set_token(token.clone());

                if remember {
                    if let Err(err) = CredentialStore::default().remember(email, password) {
                        warn!(error = %err, "could not remember credentials");
                    }
                }

                let mut session = self.session();
                session.update(SessionData::new(token, email.to_string()));
                if let Err(err) = session.save() {
                    warn!(error = %err, "could not persist session");
                }
                info!(email, "logged in");
                Notice::success("Login Successful")
            }
            Err(err) => Notice::from_api_error("Login failed", &err),
        }
    }

    /// Clear the persisted session and the client's token.
    pub fn logout(&self) -> Notice {
        self.api.lock().expect("api mutex poisoned").clear_token();
        let mut session = self.session();
        match session.clear() {
            Ok(()) => Notice::success("Logged out"),
            Err(err) => Notice::error_with("Logout failed", err.to_string()),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.session().is_logged_in()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declined_confirmation_yields_no_token() {
        assert!(confirm(false).is_none());
        assert!(confirm(true).is_some());
    }
}
