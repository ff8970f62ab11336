//! The note store facade shared by every UI entry point.
//!
//! [`NoteStore`] owns the database handle and the cached [`Snapshot`].  All
//! database work goes through one mutex, so at most one operation is in
//! flight; the snapshot lives behind its own lock and is swapped while the
//! database lock is still held, so swaps happen in query order.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use notetaker_shared::constants::{COLUMN_COUNT, COMMIT_OK_MESSAGE};
use notetaker_store::{database, ChangeStamp, Database, NoteRow, StoreError};
use serde::Serialize;

use crate::auth::LoginPolicy;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::events::{DataEvent, Listeners, SubscriptionId};
use crate::snapshot::Snapshot;

/// Lifecycle of the database connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    /// The last connection attempt failed.  Only observable through
    /// [`DataEvent::ConnectionChanged`]; the store settles back to
    /// `Connected` or `Disconnected` immediately after.
    Failed,
}

/// Options fixed for the lifetime of a store.
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    /// Write a `log` row for every committed note.
    pub audit_log: bool,
    pub login_policy: LoginPolicy,
}

impl From<&ClientConfig> for StoreOptions {
    fn from(config: &ClientConfig) -> Self {
        Self {
            audit_log: config.audit_log,
            login_policy: LoginPolicy {
                max_attempts: config.max_login_attempts,
            },
        }
    }
}

/// Cheaply cloneable handle to the shared store.
#[derive(Clone)]
pub struct NoteStore {
    inner: Arc<Inner>,
}

struct Inner {
    database: Mutex<Option<Database>>,
    snapshot: RwLock<Arc<Snapshot>>,
    state: Mutex<ConnectionState>,
    listeners: Listeners,
    options: StoreOptions,
}

impl NoteStore {
    /// Create a disconnected store.
    pub fn new(options: StoreOptions) -> Self {
        Self {
            inner: Arc::new(Inner {
                database: Mutex::new(None),
                snapshot: RwLock::new(Arc::new(Snapshot::default())),
                state: Mutex::new(ConnectionState::Disconnected),
                listeners: Listeners::default(),
                options,
            }),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(StoreOptions::from(config))
    }

    pub fn options(&self) -> &StoreOptions {
        &self.inner.options
    }

    // ------------------------------------------------------------------
    // Connection
    // ------------------------------------------------------------------

    /// Connect to the database at `location` and load its notes.
    ///
    /// The new file is opened and its notes read before the current one is
    /// closed: if either step fails the previous connection and table stay
    /// installed and usable, and the error is returned as
    /// [`ClientError::Connection`].  On success the previous connection is
    /// closed and the snapshot replaced.  Returns the location as a status
    /// string.
    pub fn initiate(&self, location: impl AsRef<Path>) -> Result<String> {
        let location = location.as_ref();
        let mut guard = self.lock_db()?;
        self.set_state(ConnectionState::Connecting);

        let opened = Database::open_at(location).and_then(|mut db| {
            db.set_audit_log(self.inner.options.audit_log);
            match read_table(&db) {
                Ok((stamp, rows)) => Ok((db, stamp, rows)),
                Err(source) => {
                    let _ = db.close();
                    Err(StoreError::Connection {
                        path: location.to_path_buf(),
                        source: Box::new(source),
                    })
                }
            }
        });

        let (db, stamp, rows) = match opened {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!(path = %location.display(), error = %e, "database connection failed");
                self.set_state(ConnectionState::Failed);
                self.set_state(if guard.is_some() {
                    ConnectionState::Connected
                } else {
                    ConnectionState::Disconnected
                });
                return Err(ClientError::Connection(e));
            }
        };

        if let Some(old) = guard.replace(db) {
            if let Err(e) = old.close() {
                tracing::warn!(error = %e, "failed to close previous database");
            }
        }
        self.set_state(ConnectionState::Connected);
        let version = self.install_snapshot(rows, Some(stamp));

        tracing::debug!(path = %location.display(), version, "completed database connection");
        Ok(location.display().to_string())
    }

    /// Connect to the configured database, or the platform default location
    /// when none is configured.
    pub fn initiate_configured(&self, config: &ClientConfig) -> Result<String> {
        let path = match &config.db_path {
            Some(path) => path.clone(),
            None => {
                let path = database::default_path().map_err(ClientError::Connection)?;
                if let Some(dir) = path.parent() {
                    std::fs::create_dir_all(dir)?;
                }
                path
            }
        };
        self.initiate(path)
    }

    /// Close the connection and clear the table.  Calling it again is a no-op.
    pub fn close(&self) -> Result<()> {
        let mut guard = self.lock_db()?;
        let Some(db) = guard.take() else {
            return Ok(());
        };

        let closed = db.close();
        self.install_snapshot(Vec::new(), None);
        self.set_state(ConnectionState::Disconnected);
        closed.map_err(ClientError::from)
    }

    pub fn connection_state(&self) -> ConnectionState {
        *self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Path of the open database file, if connected.
    pub fn location(&self) -> Option<PathBuf> {
        self.lock_db().ok()?.as_ref().and_then(Database::path)
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Commit a new note authored by `author`, with the files at
    /// `attachments`, then refresh the table.
    ///
    /// Blank text is rejected.  The commit is all-or-nothing: an unreadable
    /// attachment leaves the database unchanged.  A refresh failure after a
    /// successful commit is reported as
    /// [`ClientError::CommittedNotRefreshed`] so callers do not retry.
    pub fn commit_new_note<P: AsRef<Path>>(
        &self,
        text: &str,
        author: &str,
        attachments: &[P],
    ) -> Result<String> {
        if text.trim().is_empty() {
            return Err(ClientError::EmptyNote);
        }

        tracing::debug!(author, attachments = attachments.len(), "committing new note");

        let mut guard = self.lock_db()?;
        let db = guard.as_mut().ok_or(ClientError::NotConnected)?;

        let note_id = db.insert_note(text, author, attachments)?;
        if let Err(source) = self.refresh_with(db) {
            tracing::warn!(note_id, error = %source, "note committed but refresh failed");
            return Err(ClientError::CommittedNotRefreshed { note_id, source });
        }

        Ok(COMMIT_OK_MESSAGE.to_string())
    }

    // ------------------------------------------------------------------
    // Refresh
    // ------------------------------------------------------------------

    /// Re-read every note and replace the cached table.  Returns the new
    /// snapshot version.
    pub fn refresh(&self) -> Result<u64> {
        let guard = self.lock_db()?;
        let db = guard.as_ref().ok_or(ClientError::NotConnected)?;
        Ok(self.refresh_with(db)?)
    }

    /// Refresh only when the database changed since the last refresh.
    /// Returns whether a refresh happened.
    ///
    /// A change is a moved update marker or a different note count or
    /// newest note id, which also catches writers that never set the
    /// marker.  Edits to existing rows by such writers go unnoticed.
    pub fn refresh_if_stale(&self) -> Result<bool> {
        let guard = self.lock_db()?;
        let db = guard.as_ref().ok_or(ClientError::NotConnected)?;

        let stamp = db.change_stamp()?;
        if self.snapshot().stamp() == Some(stamp) {
            return Ok(false);
        }

        self.refresh_with(db)?;
        Ok(true)
    }

    /// Time of the most recent commit recorded in the database.
    pub fn last_update(&self) -> Result<Option<chrono::NaiveDateTime>> {
        let guard = self.lock_db()?;
        let db = guard.as_ref().ok_or(ClientError::NotConnected)?;
        Ok(db.last_update()?)
    }

    fn refresh_with(&self, db: &Database) -> notetaker_store::Result<u64> {
        let (stamp, rows) = read_table(db)?;
        let version = self.install_snapshot(rows, Some(stamp));
        tracing::debug!(version, "fetched new data");
        Ok(version)
    }

    fn install_snapshot(&self, rows: Vec<NoteRow>, stamp: Option<ChangeStamp>) -> u64 {
        self.inner.listeners.emit(&DataEvent::AboutToChange);

        let row_count = rows.len();
        let version = {
            let mut slot = self
                .inner
                .snapshot
                .write()
                .unwrap_or_else(|e| e.into_inner());
            let version = slot.version() + 1;
            *slot = Arc::new(Snapshot::new(version, rows, stamp));
            version
        };

        self.inner.listeners.emit(&DataEvent::Changed {
            version,
            rows: row_count,
        });
        version
    }

    // ------------------------------------------------------------------
    // Table access (never touches the database)
    // ------------------------------------------------------------------

    /// The current snapshot.  Cheap; the returned value never changes.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        let slot = self
            .inner
            .snapshot
            .read()
            .unwrap_or_else(|e| e.into_inner());
        Arc::clone(&slot)
    }

    pub fn version(&self) -> u64 {
        self.snapshot().version()
    }

    pub fn row_count(&self) -> usize {
        self.snapshot().row_count()
    }

    pub fn column_count(&self) -> usize {
        COLUMN_COUNT
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<String> {
        self.snapshot().cell(row, col)
    }

    pub fn header(&self, col: usize) -> Option<&'static str> {
        Snapshot::header(col)
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&DataEvent) + Send + Sync + 'static,
    {
        self.inner.listeners.add(Arc::new(listener))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.listeners.remove(id)
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    pub(crate) fn lock_db(&self) -> Result<MutexGuard<'_, Option<Database>>> {
        self.inner
            .database
            .lock()
            .map_err(|_| ClientError::LockPoisoned)
    }

    fn set_state(&self, state: ConnectionState) {
        {
            let mut current = self.inner.state.lock().unwrap_or_else(|e| e.into_inner());
            if *current == state {
                return;
            }
            *current = state;
        }
        tracing::debug!(?state, "connection state changed");
        self.inner
            .listeners
            .emit(&DataEvent::ConnectionChanged { state });
    }
}

/// The stamp is read first, so a write landing in between makes the next
/// staleness check refresh again rather than miss it.
fn read_table(db: &Database) -> notetaker_store::Result<(ChangeStamp, Vec<NoteRow>)> {
    let stamp = db.change_stamp()?;
    let rows = db.query_all_notes()?;
    Ok((stamp, rows))
}

impl Default for NoteStore {
    fn default() -> Self {
        Self::new(StoreOptions::default())
    }
}
