//! Domain model structs persisted in the local SQLite database.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to a UI layer.

use chrono::NaiveDateTime;
use notetaker_shared::constants::COLUMN_COUNT;
use serde::{Deserialize, Serialize};

use crate::timestamp;

pub type UserId = i64;
pub type NoteId = i64;
pub type AttachmentId = i64;

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A user allowed to author notes.  Provisioned out of band.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// PBKDF2-SHA256 hash in modular-crypt format.
    pub password_hash: String,
}

// ---------------------------------------------------------------------------
// Note
// ---------------------------------------------------------------------------

/// A single timestamped text entry.  Every commit inserts a new row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    /// `None` for rows written without a timestamp by older tools.
    pub created_at: Option<NaiveDateTime>,
    pub text: String,
    /// Username of the author, references [`User::username`].
    pub author: String,
    pub last_updated_at: Option<NaiveDateTime>,
}

// ---------------------------------------------------------------------------
// Attachment
// ---------------------------------------------------------------------------

/// A named binary blob linked to notes through `note_attachment`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    pub id: AttachmentId,
    /// File name of the source file (no directory part).
    pub name: String,
    pub data: Vec<u8>,
}

/// Join record between a note and an attachment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoteAttachment {
    pub id: i64,
    pub note_id: NoteId,
    pub attach_id: AttachmentId,
}

// ---------------------------------------------------------------------------
// Log
// ---------------------------------------------------------------------------

/// An audit record of a note transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogEntry {
    pub id: i64,
    pub timestamp: NaiveDateTime,
    pub text: String,
}

// ---------------------------------------------------------------------------
// ChangeStamp
// ---------------------------------------------------------------------------

/// What a reader needs to tell whether the note table moved since it last
/// looked.  The marker alone misses writers that never touch it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangeStamp {
    pub last_update: Option<NaiveDateTime>,
    pub note_count: i64,
    pub newest_note: Option<NoteId>,
}

// ---------------------------------------------------------------------------
// NoteRow
// ---------------------------------------------------------------------------

/// One denormalized table row: a note plus the names of its attachments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoteRow {
    pub note_id: NoteId,
    pub created_at: Option<NaiveDateTime>,
    pub text: String,
    pub author: String,
    pub last_updated_at: Option<NaiveDateTime>,
    /// Attachment names joined by newline, in link order.  Empty when none.
    pub attachments: String,
}

impl NoteRow {
    /// Display value of column `col`, following the table header order.
    pub fn cell(&self, col: usize) -> Option<String> {
        match col {
            0 => Some(display_timestamp(self.created_at.as_ref())),
            1 => Some(self.text.clone()),
            2 => Some(self.author.clone()),
            3 => Some(display_timestamp(self.last_updated_at.as_ref())),
            4 => Some(self.attachments.clone()),
            _ => None,
        }
    }

    /// All display values in column order.
    pub fn cells(&self) -> Vec<String> {
        (0..COLUMN_COUNT).filter_map(|c| self.cell(c)).collect()
    }

    pub fn attachment_names(&self) -> impl Iterator<Item = &str> {
        self.attachments
            .split(notetaker_shared::constants::ATTACHMENT_SEPARATOR)
            .filter(|s| !s.is_empty())
    }
}

/// Missing timestamps display as an empty cell.
fn display_timestamp(ts: Option<&NaiveDateTime>) -> String {
    ts.map(timestamp::format).unwrap_or_default()
}
