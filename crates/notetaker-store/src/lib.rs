//! # notetaker-store
//!
//! Local SQLite storage for NoteTaker.
//!
//! The crate exposes a synchronous [`Database`] handle that wraps a
//! `rusqlite::Connection` and provides typed helpers for users, notes,
//! attachments and the audit log.  Notes and attachments are append-only.

pub mod attachments;
pub mod audit;
pub mod database;
pub mod migrations;
pub mod models;
pub mod notes;
pub mod timestamp;
pub mod users;

mod error;

pub use database::Database;
pub use error::{Result, StoreError};
pub use models::*;
