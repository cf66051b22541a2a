//! Session identity
//!
//! Login and registration live outside this client; they leave a small
//! key/value store behind (`username`, `firstname`, `lastname`). This module
//! only reads it, and reads it again every time an answer is needed.

use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

pub const USERNAME_KEY: &str = "username";
pub const FIRSTNAME_KEY: &str = "firstname";
pub const LASTNAME_KEY: &str = "lastname";

/// Marker that shows up when a name part was never set
const PLACEHOLDER: &str = "null";

/// Read-only access to the session key/value store
pub trait IdentityProvider: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Session store backed by a JSON object file
///
/// A missing or unreadable file is an anonymous session.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read(&self) -> HashMap<String, Value> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => return HashMap::new(),
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            debug!(path = %self.path.display(), error = %e, "session file is not a JSON object");
            HashMap::new()
        })
    }
}

impl IdentityProvider for SessionFile {
    fn get(&self, key: &str) -> Option<String> {
        match self.read().remove(key)? {
            Value::String(s) => Some(s),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// Decides what a user may do based on the session store
#[derive(Clone)]
pub struct SessionGate {
    provider: Arc<dyn IdentityProvider>,
}

impl SessionGate {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    pub fn username(&self) -> Option<String> {
        self.provider
            .get(USERNAME_KEY)
            .filter(|name| !name.is_empty())
    }

    /// True iff a username is present
    pub fn is_authenticated(&self) -> bool {
        self.username().is_some()
    }

    /// Author name for a review
    ///
    /// `"<first> <last>"`, unless either part is unset (rendered as the
    /// placeholder), in which case the username.
    pub fn display_name(&self) -> Option<String> {
        let part = |key| {
            self.provider
                .get(key)
                .unwrap_or_else(|| PLACEHOLDER.to_string())
        };
        let full = format!("{} {}", part(FIRSTNAME_KEY), part(LASTNAME_KEY));

        if full.contains(PLACEHOLDER) {
            self.username()
        } else {
            Some(full)
        }
    }
}
