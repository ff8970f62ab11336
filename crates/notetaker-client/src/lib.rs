//! # notetaker-client
//!
//! The note store facade consumed by a NoteTaker user interface.  It wraps a
//! [`notetaker_store::Database`], keeps an in-memory snapshot of the note
//! table for display, checks credentials, exports CSV and notifies listeners
//! when the table changes.

pub mod auth;
pub mod config;
pub mod error;
pub mod events;
pub mod export;
pub mod snapshot;
pub mod state;
pub mod tasks;
pub mod view;

use tracing_subscriber::{fmt, EnvFilter};

pub use auth::{Credentials, LoginPolicy};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use events::{DataEvent, SubscriptionId};
pub use snapshot::Snapshot;
pub use state::{ConnectionState, NoteStore, StoreOptions};
pub use view::{RowFilter, SortOrder};

/// Install the global tracing subscriber.  `RUST_LOG` overrides the default
/// filter.  Fails if a subscriber is already installed.
pub fn init_tracing() -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("notetaker_client=debug,notetaker_store=info,warn")
    });

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
}
