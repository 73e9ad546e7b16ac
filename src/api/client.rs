//! API client for the league administration REST backend.
//!
//! Thin typed wrapper over the backend's resource endpoints. Collection
//! reads unwrap the backend's `{resourcePlural: [...]}` envelopes here
//! so the rest of the crate only ever sees domain types.

use std::time::Duration;

use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::{
    Group, GroupDraft, GroupWrapper, GroupsResponse, League, LeagueDraft, LeaguesResponse, Match,
    MatchDraft, MatchStatus, MatchesResponse, Player, PlayerDraft, PlayersResponse, Team,
    TeamDraft, TeamWrapper, TeamsResponse, User, UserDraft, UsersResponse,
};

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    data: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: bool,
}

#[derive(Debug, Deserialize)]
struct UserDataResponse {
    data: User,
}

/// API client for the league backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token: None,
        })
    }

    /// Set the bearer token for authenticated requests
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Drop the bearer token (logout)
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(), // Cheap clone, shares connection pool
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, &url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(path, "GET");
        let response = self.request(Method::GET, path).send().await?;
        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Bad response from {}: {}", path, e)))
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!(path, "POST");
        let response = self.request(Method::POST, path).json(body).send().await?;
        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Bad response from {}: {}", path, e)))
    }

    /// Fire a write request whose response body we do not care about
    /// (the backend acks creates/updates/deletes with empty or echoed
    /// payloads; reads go back through the cache anyway).
    async fn execute<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        debug!(path, method = %method, "write");
        let response = self.request(method, path).json(body).send().await?;
        Self::check_response(response).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        debug!(path, "DELETE");
        let response = self.request(Method::DELETE, path).send().await?;
        Self::check_response(response).await?;
        Ok(())
    }

    // ===== Leagues =====

    pub async fn list_leagues(&self) -> Result<Vec<League>, ApiError> {
        let response: LeaguesResponse = self.get("/leagues/get-leagues").await?;
        Ok(response.leagues)
    }

    /// `get-league/{id}` returns the record bare, unlike teams/groups.
    pub async fn get_league(&self, id: i64) -> Result<League, ApiError> {
        self.get(&format!("/leagues/get-league/{}", id)).await
    }

    pub async fn create_league(&self, draft: &LeagueDraft) -> Result<(), ApiError> {
        self.execute(Method::POST, "/leagues/create-league", draft)
            .await
    }

    pub async fn update_league(&self, id: i64, draft: &LeagueDraft) -> Result<(), ApiError> {
        self.execute(Method::PATCH, &format!("/leagues/update-league/{}", id), draft)
            .await
    }

    pub async fn delete_league(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/leagues/delete-league/{}", id)).await
    }

    // ===== Groups =====

    pub async fn list_groups(&self) -> Result<Vec<Group>, ApiError> {
        let response: GroupsResponse = self.get("/groups/get-groups").await?;
        Ok(response.groups)
    }

    pub async fn get_group(&self, id: i64) -> Result<Group, ApiError> {
        let response: GroupWrapper = self.get(&format!("/groups/get-group/{}", id)).await?;
        Ok(response.group)
    }

    pub async fn create_group(&self, draft: &GroupDraft) -> Result<(), ApiError> {
        self.execute(Method::POST, "/groups/create-group", draft)
            .await
    }

    pub async fn update_group(&self, id: i64, draft: &GroupDraft) -> Result<(), ApiError> {
        self.execute(Method::PATCH, &format!("/groups/update-group/{}", id), draft)
            .await
    }

    pub async fn delete_group(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/groups/delete-group/{}", id)).await
    }

    // ===== Teams =====

    pub async fn list_teams(&self) -> Result<Vec<Team>, ApiError> {
        let response: TeamsResponse = self.get("/teams/get-teams").await?;
        Ok(response.teams)
    }

    pub async fn get_team(&self, id: i64) -> Result<Team, ApiError> {
        let response: TeamWrapper = self.get(&format!("/teams/get-team/{}", id)).await?;
        Ok(response.team)
    }

    pub async fn create_team(&self, draft: &TeamDraft) -> Result<(), ApiError> {
        self.execute(Method::POST, "/teams/create-team", draft).await
    }

    pub async fn update_team(&self, id: i64, draft: &TeamDraft) -> Result<(), ApiError> {
        self.execute(Method::PATCH, &format!("/teams/update-team/{}", id), draft)
            .await
    }

    pub async fn delete_team(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/teams/delete-team/{}", id)).await
    }

    // ===== Players =====

    pub async fn list_players(&self) -> Result<Vec<Player>, ApiError> {
        let response: PlayersResponse = self.get("/players/get-players").await?;
        Ok(response.players)
    }

    pub async fn create_player(&self, draft: &PlayerDraft) -> Result<(), ApiError> {
        self.execute(Method::POST, "/players/create-player", draft)
            .await
    }

    pub async fn update_player(&self, id: i64, draft: &PlayerDraft) -> Result<(), ApiError> {
        self.execute(Method::PATCH, &format!("/players/update-player/{}", id), draft)
            .await
    }

    pub async fn delete_player(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/players/delete-player/{}", id)).await
    }

    // ===== Matches =====

    pub async fn list_matches(&self) -> Result<Vec<Match>, ApiError> {
        let response: MatchesResponse = self.get("/matches/get-matches").await?;
        Ok(response.matches)
    }

    pub async fn get_match(&self, id: i64) -> Result<Match, ApiError> {
        self.get(&format!("/matches/get-match/{}", id)).await
    }

    pub async fn create_match(&self, draft: &MatchDraft) -> Result<(), ApiError> {
        self.execute(Method::POST, "/matches/create-match", draft)
            .await
    }

    pub async fn update_match(&self, id: i64, draft: &MatchDraft) -> Result<(), ApiError> {
        self.execute(Method::PATCH, &format!("/matches/update-match/{}", id), draft)
            .await
    }

    pub async fn delete_match(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/matches/delete-match/{}", id)).await
    }

    // ===== Livescore =====

    pub async fn update_match_status(&self, id: i64, status: MatchStatus) -> Result<(), ApiError> {
        let body = serde_json::json!({ "status": status });
        self.execute(
            Method::PATCH,
            &format!("/matches/update-match-status/{}", id),
            &body,
        )
        .await
    }

    pub async fn update_match_score(&self, id: i64, home: i32, away: i32) -> Result<(), ApiError> {
        let body = serde_json::json!({ "scoreTeamOne": home, "scoreTeamTwo": away });
        self.execute(
            Method::PATCH,
            &format!("/matches/update-match-score/{}", id),
            &body,
        )
        .await
    }

    /// Credit standings points to a team (3 for a win, 1 for a draw,
    /// 0 for a loss; the caller decides the amount).
    pub async fn add_points(&self, team_id: i64, points: i32) -> Result<(), ApiError> {
        let body = serde_json::json!({ "teamId": team_id, "points": points });
        self.execute(Method::POST, "/teams/add-points", &body).await
    }

    // ===== Users =====

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let response: UsersResponse = self.get("/users/get-users").await?;
        Ok(response.users)
    }

    /// User creation goes through the registration endpoint.
    pub async fn register_user(&self, draft: &UserDraft) -> Result<(), ApiError> {
        self.execute(Method::POST, "/users/register-user", draft)
            .await
    }

    pub async fn update_user(&self, id: i64, draft: &UserDraft) -> Result<(), ApiError> {
        self.execute(Method::PATCH, &format!("/users/update-user/{}", id), draft)
            .await
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/users/delete-user/{}", id)).await
    }

    // ===== Auth =====

    /// Log in and return the opaque session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let response: LoginResponse = self.post("/users/login-user", &body).await?;
        Ok(response.data)
    }

    /// Fetch the profile of the account a session token belongs to.
    /// The backend resolves the token from the body, not the header.
    pub async fn user_profile(&self, token: &str) -> Result<User, ApiError> {
        let body = serde_json::json!({ "token": token });
        let response: UserDataResponse = self.post("/users/userdata", &body).await?;
        Ok(response.data)
    }

    /// Ask the backend to email a reset code to `email`.
    pub async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        let body = serde_json::json!({ "email": email });
        self.execute(Method::POST, "/users/forgot-password", &body)
            .await
    }

    /// Verify a reset code. A `false` status means the code is wrong or
    /// expired; only the backend knows which.
    pub async fn check_token(&self, email: &str, token: &str) -> Result<bool, ApiError> {
        let body = serde_json::json!({ "email": email, "token": token });
        let response: StatusResponse = self.post("/users/check-token", &body).await?;
        Ok(response.status)
    }

    /// Set a new password using a verified reset code.
    pub async fn reset_password(
        &self,
        email: &str,
        token: &str,
        password: &str,
    ) -> Result<bool, ApiError> {
        let body = serde_json::json!({ "email": email, "token": token, "password": password });
        let response: StatusResponse = self.post("/users/reset-password", &body).await?;
        Ok(response.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_list_unwraps_collection_envelope() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/leagues/get-leagues");
                then.status(200).json_body(serde_json::json!({
                    "leagues": [{
                        "id": 1, "name": "Premier", "year": "2025", "season": "summer",
                        "startDate": "2025-06-01T00:00:00.000Z",
                        "endDate": "2025-08-31T00:00:00.000Z"
                    }]
                }));
            })
            .await;

        let client = ApiClient::new(server.base_url()).expect("client");
        let leagues = client.list_leagues().await.expect("list leagues");
        assert_eq!(leagues.len(), 1);
        assert_eq!(leagues[0].name, "Premier");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_bearer_token_attached_when_set() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(DELETE)
                    .path("/teams/delete-team/4")
                    .header("authorization", "Bearer sekrit");
                then.status(200);
            })
            .await;

        let client = ApiClient::new(server.base_url())
            .expect("client")
            .with_token("sekrit".to_string());
        client.delete_team(4).await.expect("delete team");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_body_surfaces_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/users/get-users");
                then.status(500)
                    .json_body(serde_json::json!({ "message": "db down" }));
            })
            .await;

        let client = ApiClient::new(server.base_url()).expect("client");
        let err = client.list_users().await.expect_err("should fail");
        assert_eq!(err.user_message(), "db down");
    }
}
