//! Application configuration management.
//!
//! This module handles loading and saving the client configuration,
//! which covers the backend base URL and the last email used to log in.
//!
//! Configuration is stored at `~/.config/leaguedesk/config.json`; the
//! base URL can be overridden with the `LEAGUEDESK_API_URL` environment
//! variable (a `.env` file is honored).

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "leaguedesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the backend base URL
const API_URL_ENV: &str = "LEAGUEDESK_API_URL";

/// Production backend
const DEFAULT_API_URL: &str = "https://api.leaguedesk.app";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if present (silently ignore if not found)
        let _ = dotenvy::dotenv();

        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Backend base URL: explicit config wins, then the environment,
    /// then the production default.
    pub fn api_base_url(&self) -> String {
        if let Some(url) = &self.api_base_url {
            return url.clone();
        }
        std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string())
    }

    /// Directory for locally persisted state (session file).
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_base_url_wins() {
        let config = Config {
            api_base_url: Some("http://localhost:4000".into()),
            last_email: None,
        };
        assert_eq!(config.api_base_url(), "http://localhost:4000");
    }
}
