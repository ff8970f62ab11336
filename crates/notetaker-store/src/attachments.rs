//! Read access to stored attachments.

use rusqlite::params;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{Attachment, AttachmentId, NoteAttachment, NoteId};

impl Database {
    pub fn get_attachment(&self, id: AttachmentId) -> Result<Attachment> {
        self.conn()
            .query_row(
                "SELECT attach_id, name, data FROM attachment WHERE attach_id = ?1",
                params![id],
                row_to_attachment,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// Attachments linked to a note, in link order.
    pub fn attachments_for_note(&self, note_id: NoteId) -> Result<Vec<Attachment>> {
        let mut stmt = self.conn().prepare(
            "SELECT a.attach_id, a.name, a.data
             FROM note_attachment na
             JOIN attachment a ON a.attach_id = na.attach_id
             WHERE na.note_id = ?1
             ORDER BY na.id ASC",
        )?;

        let rows = stmt.query_map(params![note_id], row_to_attachment)?;

        let mut attachments = Vec::new();
        for row in rows {
            attachments.push(row?);
        }
        Ok(attachments)
    }

    pub fn links_for_note(&self, note_id: NoteId) -> Result<Vec<NoteAttachment>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, note_id, attach_id FROM note_attachment
             WHERE note_id = ?1 ORDER BY id ASC",
        )?;

        let rows = stmt.query_map(params![note_id], |row| {
            Ok(NoteAttachment {
                id: row.get(0)?,
                note_id: row.get(1)?,
                attach_id: row.get(2)?,
            })
        })?;

        let mut links = Vec::new();
        for row in rows {
            links.push(row?);
        }
        Ok(links)
    }
}

fn row_to_attachment(row: &rusqlite::Row<'_>) -> rusqlite::Result<Attachment> {
    Ok(Attachment {
        id: row.get(0)?,
        name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        data: row.get::<_, Option<Vec<u8>>>(2)?.unwrap_or_default(),
    })
}
