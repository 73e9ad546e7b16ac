use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// Where the app should land on startup, decided from persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartRoute {
    Login,
    AdminHome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub email: String,
    #[serde(rename = "isLoggedIn")]
    pub is_logged_in: bool,
    pub created_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(token: String, email: String) -> Self {
        Self {
            token,
            email,
            is_logged_in: true,
            created_at: Utc::now(),
        }
    }
}

pub struct Session {
    cache_dir: PathBuf,
    pub data: Option<SessionData>,
}

impl Session {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            data: None,
        }
    }

    /// Load session from disk. Returns whether a logged-in session was found.
    pub fn load(&mut self) -> Result<bool> {
        let path = self.session_path();
        if path.exists() {
            let contents =
                std::fs::read_to_string(&path).context("Failed to read session file")?;
            let data: SessionData =
                serde_json::from_str(&contents).context("Failed to parse session file")?;

            if data.is_logged_in {
                self.data = Some(data);
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Save session to disk
    pub fn save(&self) -> Result<()> {
        if let Some(ref data) = self.data {
            let path = self.session_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(data)?;
            std::fs::write(path, contents)?;
        }
        Ok(())
    }

    /// Clear session data (logout)
    pub fn clear(&mut self) -> Result<()> {
        self.data = None;
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Update session with new data
    pub fn update(&mut self, data: SessionData) {
        self.data = Some(data);
    }

    /// Get the bearer token if logged in
    pub fn token(&self) -> Option<&str> {
        self.data
            .as_ref()
            .filter(|d| d.is_logged_in)
            .map(|d| d.token.as_str())
    }

    pub fn is_logged_in(&self) -> bool {
        self.data.as_ref().map(|d| d.is_logged_in).unwrap_or(false)
    }

    /// Initial navigation target, decided once at startup.
    pub fn start_route(&self) -> StartRoute {
        if self.is_logged_in() {
            StartRoute::AdminHome
        } else {
            StartRoute::Login
        }
    }

    fn session_path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "leaguedesk-session-test-{}-{}",
            tag,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn test_save_load_clear_round_trip() {
        let dir = temp_dir("roundtrip");

        let mut session = Session::new(dir.clone());
        session.update(SessionData::new("tok123".into(), "a@b.com".into()));
        session.save().expect("save session");
        assert_eq!(session.start_route(), StartRoute::AdminHome);

        let mut reloaded = Session::new(dir.clone());
        assert!(reloaded.load().expect("load session"));
        assert_eq!(reloaded.token(), Some("tok123"));
        assert_eq!(reloaded.start_route(), StartRoute::AdminHome);

        reloaded.clear().expect("clear session");
        let mut after_logout = Session::new(dir.clone());
        assert!(!after_logout.load().expect("load after clear"));
        assert_eq!(after_logout.start_route(), StartRoute::Login);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_fresh_session_routes_to_login() {
        let dir = temp_dir("fresh");
        let mut session = Session::new(dir.clone());
        assert!(!session.load().expect("load empty"));
        assert_eq!(session.start_route(), StartRoute::Login);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
