//! User lookup and provisioning.

use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::Result;
use crate::models::{User, UserId};

impl Database {
    /// Look a user up by exact username.
    pub fn find_user(&self, username: &str) -> Result<Option<User>> {
        let user = self
            .conn()
            .query_row(
                "SELECT user_id, username, pwhash FROM user WHERE username = ?1",
                params![username],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        password_hash: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    /// Add a user.  Users are normally provisioned by an administrator; the
    /// application itself never registers accounts.
    pub fn create_user(&self, username: &str, password_hash: &str) -> Result<UserId> {
        self.conn().execute(
            "INSERT INTO user (username, pwhash) VALUES (?1, ?2)",
            params![username, password_hash],
        )?;
        let id = self.conn().last_insert_rowid();
        tracing::info!(user_id = id, username, "user created");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreError;

    #[test]
    fn find_existing_and_missing() {
        let db = Database::open_in_memory().unwrap();
        let id = db.create_user("alice", "$pbkdf2-sha256$1$AA$AA").unwrap();

        let user = db.find_user("alice").unwrap().expect("alice exists");
        assert_eq!(user.id, id);
        assert_eq!(user.password_hash, "$pbkdf2-sha256$1$AA$AA");

        assert!(db.find_user("Alice").unwrap().is_none());
        assert!(db.find_user("bob").unwrap().is_none());
    }

    #[test]
    fn usernames_are_unique() {
        let db = Database::open_in_memory().unwrap();
        db.create_user("alice", "x").unwrap();
        assert!(matches!(
            db.create_user("alice", "y"),
            Err(StoreError::Sqlite(_))
        ));
    }
}
