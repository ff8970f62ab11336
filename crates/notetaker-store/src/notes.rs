//! Note commits and the denormalized note listing.

use std::path::Path;

use notetaker_shared::constants::ATTACHMENT_SEPARATOR;
use rusqlite::{params, OptionalExtension};

use crate::audit;
use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{NoteId, NoteRow};
use crate::timestamp;

/// An attachment file read into memory, ready to insert.
struct PendingAttachment {
    name: String,
    data: Vec<u8>,
}

impl Database {
    /// Insert a note and its attachments.
    ///
    /// Attachment files are read before anything is written; an unreadable
    /// path aborts the commit with [`StoreError::Attachment`].  The note, the
    /// attachment rows, the join rows, the update marker and (when enabled)
    /// the audit log entry are written in a single transaction.
    pub fn insert_note<P: AsRef<Path>>(
        &mut self,
        text: &str,
        author: &str,
        attachments: &[P],
    ) -> Result<NoteId> {
        let pending = attachments
            .iter()
            .map(|p| read_attachment(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let now = timestamp::now();
        let now_str = timestamp::format(&now);
        let audit_log = self.audit_log();

        let tx = self.conn_mut().transaction()?;

        let known: Option<i64> = tx
            .query_row(
                "SELECT user_id FROM user WHERE username = ?1",
                params![author],
                |row| row.get(0),
            )
            .optional()?;
        if known.is_none() {
            return Err(StoreError::UnknownAuthor(author.to_string()));
        }

        tx.execute(
            "INSERT INTO note (datetime, text, user, last_update) VALUES (?1, ?2, ?3, ?4)",
            params![now_str, text, author, now_str],
        )?;
        let note_id = tx.last_insert_rowid();

        for attachment in &pending {
            tx.execute(
                "INSERT INTO attachment (name, data) VALUES (?1, ?2)",
                params![attachment.name, attachment.data],
            )?;
            let attach_id = tx.last_insert_rowid();

            tx.execute(
                "INSERT INTO note_attachment (note_id, attach_id) VALUES (?1, ?2)",
                params![note_id, attach_id],
            )?;
        }

        audit::touch_update_marker(&tx, &now)?;
        if audit_log {
            audit::insert_log(&tx, &now, text)?;
        }

        tx.commit()?;

        tracing::info!(
            note_id,
            author,
            attachments = pending.len(),
            "note committed"
        );
        Ok(note_id)
    }

    /// Every note with its attachment names, oldest first.
    ///
    /// Notes sharing a creation time keep insertion order, and attachment
    /// names follow link insertion order.  Rows left by older writers with
    /// a NULL or unreadable timestamp are still listed, with no time.
    pub fn query_all_notes(&self) -> Result<Vec<NoteRow>> {
        let mut stmt = self.conn().prepare(
            "SELECT n.note_id, n.datetime, n.text, n.user, n.last_update, a.name
             FROM note n
             LEFT JOIN note_attachment na ON na.note_id = n.note_id
             LEFT JOIN attachment a ON a.attach_id = na.attach_id
             ORDER BY n.datetime ASC, n.note_id ASC, na.id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let note_row = NoteRow {
                note_id: row.get(0)?,
                created_at: timestamp::optional_column(row, 1)?,
                text: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                author: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                last_updated_at: timestamp::optional_column(row, 4)?,
                attachments: String::new(),
            };
            let attachment: Option<String> = row.get(5)?;
            Ok((note_row, attachment))
        })?;

        let mut notes: Vec<NoteRow> = Vec::new();
        for row in rows {
            let (note_row, attachment) = row?;

            let same_note = notes
                .last()
                .map_or(false, |last| last.note_id == note_row.note_id);
            if !same_note {
                notes.push(note_row);
            }

            if let (Some(name), Some(current)) = (attachment, notes.last_mut()) {
                if !current.attachments.is_empty() {
                    current.attachments.push_str(ATTACHMENT_SEPARATOR);
                }
                current.attachments.push_str(&name);
            }
        }

        tracing::debug!(rows = notes.len(), "queried all notes");
        Ok(notes)
    }

    /// Number of notes and the newest note id.  Notes are only ever
    /// appended, so any write by any tool changes this pair.
    pub fn note_stats(&self) -> Result<(i64, Option<NoteId>)> {
        Ok(self.conn().query_row(
            "SELECT COUNT(*), MAX(note_id) FROM note",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?)
    }

    pub fn count_notes(&self) -> Result<i64> {
        Ok(self
            .conn()
            .query_row("SELECT COUNT(*) FROM note", [], |row| row.get(0))?)
    }
}

fn read_attachment(path: &Path) -> Result<PendingAttachment> {
    tracing::debug!(path = %path.display(), "reading attachment");

    let data = std::fs::read(path).map_err(|source| StoreError::Attachment {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(PendingAttachment {
        name: attachment_name(path),
        data,
    })
}

/// File name component of `path`, or the whole path when it has none.
fn attachment_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
