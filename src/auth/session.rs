use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

/// A complete session. Token and username live in one struct so a
/// partial session (one without the other) is unrepresentable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub username: String,
}

/// Holds the current session and the activity clock used for idle
/// timeout. Persists to disk so a session survives restarts.
///
/// All methods are synchronous and touch nothing but the session file;
/// network liveness checks belong to the API client.
pub struct SessionStore {
    data_dir: Option<PathBuf>,
    data: Option<SessionData>,
    last_activity: DateTime<Utc>,
}

impl SessionStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir: Some(data_dir),
            data: None,
            last_activity: Utc::now(),
        }
    }

    /// A store with no backing file. Sessions live only as long as the
    /// process.
    pub fn in_memory() -> Self {
        Self {
            data_dir: None,
            data: None,
            last_activity: Utc::now(),
        }
    }

    /// Restore a previously persisted session.
    ///
    /// A missing, unreadable, or malformed session file is not an error:
    /// it means there is no session, and the store stays empty.
    pub fn load(&mut self) -> bool {
        let Some(path) = self.session_path() else {
            return false;
        };
        if !path.exists() {
            return false;
        }

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(error = %e, "Failed to read session file, treating as no session");
                return false;
            }
        };

        match serde_json::from_str::<SessionData>(&contents) {
            Ok(data) if !data.token.is_empty() && !data.username.is_empty() => {
                self.data = Some(data);
                self.last_activity = Utc::now();
                true
            }
            Ok(_) => {
                debug!("Session file has empty fields, treating as no session");
                false
            }
            Err(e) => {
                debug!(error = %e, "Failed to parse session file, treating as no session");
                false
            }
        }
    }

    /// Establish a session: both fields are set and persisted together.
    pub fn save(&mut self, token: &str, username: &str) -> Result<()> {
        let data = SessionData {
            token: token.to_string(),
            username: username.to_string(),
        };
        let contents = serde_json::to_string_pretty(&data)?;
        self.data = Some(data);
        self.last_activity = Utc::now();

        if let Some(path) = self.session_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .context("Failed to create session directory")?;
            }
            std::fs::write(&path, contents).context("Failed to write session file")?;
        }
        Ok(())
    }

    /// Drop the session and its file. Idempotent: clearing an empty
    /// store is a no-op.
    pub fn clear(&mut self) {
        self.data = None;
        if let Some(path) = self.session_path() {
            if path.exists() {
                if let Err(e) = std::fs::remove_file(&path) {
                    debug!(error = %e, "Failed to remove session file");
                }
            }
        }
    }

    /// Record the current time as the most recent user interaction.
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Override the activity timestamp.
    pub fn set_last_activity(&mut self, at: DateTime<Utc>) {
        self.last_activity = at;
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// True iff `now - last_activity >= timeout`. Exactly hitting the
    /// boundary counts as expired.
    pub fn is_expired(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        now - self.last_activity >= timeout
    }

    /// Get the bearer token if a session is active
    pub fn token(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.token.as_str())
    }

    /// Get the username if a session is active
    pub fn username(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.username.as_str())
    }

    pub fn is_active(&self) -> bool {
        self.data.is_some()
    }

    fn session_path(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join(SESSION_FILE))
    }
}
