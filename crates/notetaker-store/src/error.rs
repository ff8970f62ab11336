use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The database file could not be opened or its schema prepared.
    #[error("Cannot open database at {}: {source}", .path.display())]
    Connection {
        path: PathBuf,
        #[source]
        source: Box<StoreError>,
    },

    /// SQLite error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// An attachment file could not be read; nothing was written.
    #[error("Cannot read attachment {}: {source}", .path.display())]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The note author is not a known user.
    #[error("Unknown author: {0}")]
    UnknownAuthor(String),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Generic I/O error (e.g. creating the database directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A query expected exactly one row but found none.
    #[error("Record not found")]
    NotFound,

    /// Migration failure.
    #[error("Migration error: {0}")]
    Migration(String),

    /// Stored timestamp could not be parsed.
    #[error("Timestamp parse error: {0}")]
    Timestamp(#[from] chrono::ParseError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
