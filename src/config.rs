use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable overriding `api_base_url`
pub const API_URL_ENV: &str = "DEALERSHIP_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the dealership API, e.g. `http://localhost:8000/djangoapp/`
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Session store written by the login flow; defaults to `session.json`
    /// in the config directory
    pub session_path: Option<PathBuf>,
    /// Backend session cookie (`sessionid=...`) sent with every request;
    /// posting reviews is refused without one
    pub session_cookie: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/djangoapp/".to_string(),
            request_timeout_secs: 10,
            session_path: None,
            session_cookie: None,
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".dealership-tui"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    /// Load the config file (or defaults) and apply environment overrides
    pub fn load() -> Config {
        let mut config = Self::config_path()
            .and_then(|path| Self::load_from(&path))
            .unwrap_or_default();

        if let Ok(url) = env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                info!(%url, "API URL overridden from environment");
                config.api_base_url = url;
            }
        }

        config
    }

    fn load_from(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }

        let contents = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
                None
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Where the session store lives
    pub fn session_path(&self) -> PathBuf {
        self.session_path.clone().unwrap_or_else(|| {
            Self::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("session.json")
        })
    }
}
