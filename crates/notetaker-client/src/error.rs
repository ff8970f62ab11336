use std::path::PathBuf;

use notetaker_store::{NoteId, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Opening the database failed.  A previously open database is untouched.
    #[error("Connection error: {0}")]
    Connection(StoreError),

    #[error("No database connection")]
    NotConnected,

    #[error("Note text is empty")]
    EmptyNote,

    /// An attachment could not be read; the commit was abandoned.
    #[error("Cannot read attachment {}: {source}", .path.display())]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The note is stored but re-reading the table failed.  Retrying the
    /// commit would store it twice; refresh instead.
    #[error("Note {note_id} committed, but the table could not be refreshed: {source}")]
    CommittedNotRefreshed {
        note_id: NoteId,
        #[source]
        source: StoreError,
    },

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Export failed: {0}")]
    Export(#[from] csv::Error),

    #[error("Invalid filter pattern: {0}")]
    Filter(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Lock poisoned")]
    LockPoisoned,

    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<StoreError> for ClientError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Attachment { path, source } => ClientError::Attachment { path, source },
            e @ StoreError::Connection { .. } => ClientError::Connection(e),
            other => ClientError::Store(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
