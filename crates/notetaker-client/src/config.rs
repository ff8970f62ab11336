//! Client configuration loaded from environment variables.
//!
//! All settings have defaults, so the client starts with zero configuration.

use std::path::PathBuf;
use std::time::Duration;

use notetaker_shared::constants::DEFAULT_MAX_LOGIN_ATTEMPTS;

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Database file to open.
    /// Env: `NOTETAKER_DB_PATH`
    /// Default: `notetaker.db` in the platform data directory.
    pub db_path: Option<PathBuf>,

    /// Period of the background refresh task.
    /// Env: `NOTETAKER_REFRESH_MS` (0 disables)
    /// Default: disabled.
    pub refresh_interval: Option<Duration>,

    /// Record every committed note in the `log` table.
    /// Env: `NOTETAKER_AUDIT_LOG` (true/false)
    /// Default: `false`
    pub audit_log: bool,

    /// Login prompts shown before giving up.
    /// Env: `NOTETAKER_MAX_LOGIN_ATTEMPTS`
    /// Default: `3`
    pub max_login_attempts: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            refresh_interval: None,
            audit_log: false,
            max_login_attempts: DEFAULT_MAX_LOGIN_ATTEMPTS,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("NOTETAKER_DB_PATH") {
            if !path.trim().is_empty() {
                config.db_path = Some(PathBuf::from(path));
            }
        }

        if let Some(val) = lookup("NOTETAKER_REFRESH_MS") {
            match val.trim().parse::<u64>() {
                Ok(0) => config.refresh_interval = None,
                Ok(ms) => config.refresh_interval = Some(Duration::from_millis(ms)),
                Err(_) => {
                    tracing::warn!(value = %val, "Invalid NOTETAKER_REFRESH_MS, refresh disabled");
                }
            }
        }

        if let Some(val) = lookup("NOTETAKER_AUDIT_LOG") {
            config.audit_log = val == "true" || val == "1";
        }

        if let Some(val) = lookup("NOTETAKER_MAX_LOGIN_ATTEMPTS") {
            match val.trim().parse::<u32>() {
                Ok(n) if n > 0 => config.max_login_attempts = n,
                _ => {
                    tracing::warn!(value = %val, "Invalid NOTETAKER_MAX_LOGIN_ATTEMPTS, using default");
                }
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}
