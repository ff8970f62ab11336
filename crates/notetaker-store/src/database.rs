//! Database connection management.
//!
//! The [`Database`] struct owns the only [`rusqlite::Connection`] and
//! guarantees that migrations are run before any other operation.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rusqlite::Connection;

use crate::error::{Result, StoreError};
use crate::migrations;

/// Default database file name inside the data directory.
pub const DEFAULT_DB_FILE: &str = "notetaker.db";

/// Wrapper around a [`rusqlite::Connection`].
pub struct Database {
    conn: Connection,
    audit_log: bool,
}

impl Database {
    /// Open (or create) the default application database.
    ///
    /// The database file is placed in the platform-appropriate data directory:
    /// - Linux:   `~/.local/share/notetaker/notetaker.db`
    /// - macOS:   `~/Library/Application Support/org.notetaker.notetaker/notetaker.db`
    /// - Windows: `{FOLDERID_RoamingAppData}\notetaker\notetaker\data\notetaker.db`
    pub fn open_default() -> Result<Self> {
        let db_path = default_path()?;
        if let Some(dir) = db_path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        tracing::info!(path = %db_path.display(), "opening default database");

        Self::open_at(&db_path)
    }

    /// Open (or create) a database at an explicit path.
    ///
    /// Missing parent directories are not created.  Any failure, including a
    /// file that is not a SQLite database, is reported as
    /// [`StoreError::Connection`].
    pub fn open_at(path: &Path) -> Result<Self> {
        let connect = || -> Result<Connection> {
            let conn = Connection::open(path)?;

            conn.pragma_update(None, "journal_mode", "WAL")?;
            conn.pragma_update(None, "foreign_keys", "ON")?;

            migrations::run_migrations(&conn)?;
            Ok(conn)
        };

        let conn = connect().map_err(|e| StoreError::Connection {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

        tracing::info!(path = %path.display(), "database connected");

        Ok(Self {
            conn,
            audit_log: false,
        })
    }

    /// Open a private in-memory database with the full schema.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        migrations::run_migrations(&conn)?;

        Ok(Self {
            conn,
            audit_log: false,
        })
    }

    /// Enable or disable writing a `log` row for every committed note.
    pub fn set_audit_log(&mut self, enabled: bool) {
        self.audit_log = enabled;
    }

    pub fn audit_log(&self) -> bool {
        self.audit_log
    }

    /// Return a reference to the underlying `rusqlite::Connection`.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Return a mutable reference to the underlying connection, needed to
    /// open transactions.
    pub fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Return the filesystem path of the open database (if any).
    pub fn path(&self) -> Option<PathBuf> {
        self.conn.path().map(PathBuf::from)
    }

    /// Close the connection.  Consumes the handle, so it cannot be closed twice.
    pub fn close(self) -> Result<()> {
        let path = self.path();
        self.conn.close().map_err(|(_, e)| StoreError::Sqlite(e))?;
        tracing::debug!(path = ?path, "database closed");
        Ok(())
    }
}

/// Location of the default database file.
pub fn default_path() -> Result<PathBuf> {
    let project_dirs =
        ProjectDirs::from("org", "notetaker", "notetaker").ok_or(StoreError::NoDataDir)?;
    Ok(project_dirs.data_dir().join(DEFAULT_DB_FILE))
}
