//! Credential checks against the `user` table.

use std::fmt;

use notetaker_shared::constants::DEFAULT_MAX_LOGIN_ATTEMPTS;
use notetaker_shared::password;

use crate::error::{ClientError, Result};
use crate::state::NoteStore;

/// How many times a login prompt is shown before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginPolicy {
    pub max_attempts: u32,
}

impl Default for LoginPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_LOGIN_ATTEMPTS,
        }
    }
}

/// Username and password typed by the user.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl NoteStore {
    /// Whether `username` exists and `password` matches its stored hash.
    ///
    /// Unknown users cost the same key derivation as known ones, and a
    /// malformed stored hash is treated as a mismatch.
    pub fn is_valid_user(&self, username: &str, password: &str) -> Result<bool> {
        let user = {
            let guard = self.lock_db()?;
            let db = guard.as_ref().ok_or(ClientError::NotConnected)?;
            db.find_user(username)?
        };

        let Some(user) = user else {
            password::dummy_verify(password);
            return Ok(false);
        };

        tracing::debug!(username = %user.username, "found user in database");
        match password::verify_password(password, &user.password_hash) {
            Ok(valid) => Ok(valid),
            Err(e) => {
                tracing::warn!(username = %user.username, error = %e, "stored password hash is unusable");
                Ok(false)
            }
        }
    }

    /// Ask `prompt` for credentials until they are accepted or the policy's
    /// attempt limit is reached.  `prompt` receives the 1-based attempt
    /// number and returns `None` when the user cancels.
    ///
    /// Returns the accepted username, or `None`.
    pub fn login<F>(&self, mut prompt: F) -> Result<Option<String>>
    where
        F: FnMut(u32) -> Option<Credentials>,
    {
        let max_attempts = self.options().login_policy.max_attempts;

        for attempt in 1..=max_attempts {
            let Some(credentials) = prompt(attempt) else {
                tracing::info!(attempt, "login cancelled");
                return Ok(None);
            };

            if self.is_valid_user(&credentials.username, &credentials.password)? {
                tracing::info!(username = %credentials.username, "login accepted");
                return Ok(Some(credentials.username));
            }

            tracing::warn!(attempt, max_attempts, "login rejected");
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::connected_store;
    use crate::state::StoreOptions;

    #[test]
    fn valid_and_invalid_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let store = connected_store(dir.path());

        assert!(store.is_valid_user("alice", "wonderland").unwrap());
        assert!(!store.is_valid_user("alice", "builder").unwrap());
        assert!(!store.is_valid_user("carol", "wonderland").unwrap());
        assert!(!store.is_valid_user("", "").unwrap());
    }

    #[test]
    fn malformed_hash_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = connected_store(dir.path());
        {
            let guard = store.lock_db().unwrap();
            guard
                .as_ref()
                .unwrap()
                .create_user("mallory", "not-a-hash")
                .unwrap();
        }

        assert!(!store.is_valid_user("mallory", "not-a-hash").unwrap());
    }

    #[test]
    fn requires_connection() {
        let store = NoteStore::default();
        assert!(matches!(
            store.is_valid_user("alice", "x"),
            Err(ClientError::NotConnected)
        ));
    }

    #[test]
    fn login_succeeds_on_second_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let store = connected_store(dir.path());

        let mut asked = Vec::new();
        let user = store
            .login(|attempt| {
                asked.push(attempt);
                if attempt == 1 {
                    Some(Credentials::new("bob", "wrong"))
                } else {
                    Some(Credentials::new("bob", "builder"))
                }
            })
            .unwrap();

        assert_eq!(user.as_deref(), Some("bob"));
        assert_eq!(asked, vec![1, 2]);
    }

    #[test]
    fn login_gives_up_after_policy_limit() {
        let dir = tempfile::tempdir().unwrap();
        let store = connected_store(dir.path());

        let mut attempts = 0;
        let user = store
            .login(|_| {
                attempts += 1;
                Some(Credentials::new("alice", "nope"))
            })
            .unwrap();

        assert!(user.is_none());
        assert_eq!(attempts, LoginPolicy::default().max_attempts);
        assert_eq!(
            store.options().login_policy,
            StoreOptions::default().login_policy
        );
    }

    #[test]
    fn login_cancel_stops_prompting() {
        let dir = tempfile::tempdir().unwrap();
        let store = connected_store(dir.path());

        let mut attempts = 0;
        let user = store
            .login(|_| {
                attempts += 1;
                None
            })
            .unwrap();

        assert!(user.is_none());
        assert_eq!(attempts, 1);
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials::new("alice", "wonderland");
        let shown = format!("{creds:?}");
        assert!(shown.contains("alice"));
        assert!(!shown.contains("wonderland"));
    }
}
