//! The `log` table and the `updatetime` marker.
//!
//! Both are written from inside the note commit transaction, so the helpers
//! take a plain connection rather than a [`Database`].

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use crate::database::Database;
use crate::error::Result;
use crate::models::{ChangeStamp, LogEntry};
use crate::timestamp;

/// Replace the single marker row with `at`.
pub(crate) fn touch_update_marker(conn: &Connection, at: &NaiveDateTime) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM updatetime", [])?;
    conn.execute(
        "INSERT INTO updatetime (updatetime) VALUES (?1)",
        params![timestamp::format(at)],
    )?;
    Ok(())
}

pub(crate) fn insert_log(conn: &Connection, at: &NaiveDateTime, text: &str) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO log (timestamp, text) VALUES (?1, ?2)",
        params![timestamp::format(at), text],
    )?;
    Ok(conn.last_insert_rowid())
}

impl Database {
    /// Time of the most recent commit, or `None` for a database that has
    /// never been written through this crate.
    pub fn last_update(&self) -> Result<Option<NaiveDateTime>> {
        let raw: Option<String> = self
            .conn()
            .query_row(
                "SELECT MAX(updatetime) FROM updatetime",
                [],
                |row| row.get(0),
            )
            .optional()?
            .flatten();

        Ok(raw.map(|s| timestamp::parse(&s)).transpose()?)
    }

    /// Update marker plus note count and newest id, read together.
    pub fn change_stamp(&self) -> Result<ChangeStamp> {
        let last_update = self.last_update()?;
        let (note_count, newest_note) = self.note_stats()?;
        Ok(ChangeStamp {
            last_update,
            note_count,
            newest_note,
        })
    }

    pub fn append_log(&self, text: &str) -> Result<i64> {
        Ok(insert_log(self.conn(), &timestamp::now(), text)?)
    }

    pub fn list_log(&self) -> Result<Vec<LogEntry>> {
        let mut stmt = self.conn().prepare(
            "SELECT log_id, timestamp, text FROM log ORDER BY log_id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(LogEntry {
                id: row.get(0)?,
                timestamp: timestamp::column(row, 1)?,
                text: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_starts_empty() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.last_update().unwrap().is_none());
    }

    #[test]
    fn marker_holds_one_row() {
        let db = Database::open_in_memory().unwrap();
        let first = timestamp::parse("2020-01-01 00:00:00").unwrap();
        let second = timestamp::parse("2020-01-02 00:00:00").unwrap();
        touch_update_marker(db.conn(), &first).unwrap();
        touch_update_marker(db.conn(), &second).unwrap();

        let rows: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM updatetime", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
        assert_eq!(db.last_update().unwrap(), Some(second));
    }

    #[test]
    fn change_stamp_moves_without_marker() {
        let db = Database::open_in_memory().unwrap();
        db.create_user("alice", "$pbkdf2-sha256$1$AA$AA").unwrap();
        let before = db.change_stamp().unwrap();

        db.conn()
            .execute(
                "INSERT INTO note (datetime, text, user, last_update)
                 VALUES ('2019-03-01 08:15:00', 'from another tool', 'alice', '2019-03-01 08:15:00')",
                [],
            )
            .unwrap();

        let after = db.change_stamp().unwrap();
        assert_eq!(after.last_update, None);
        assert_eq!(after.note_count, 1);
        assert_ne!(before, after);
    }

    #[test]
    fn log_append_and_list() {
        let db = Database::open_in_memory().unwrap();
        db.append_log("first").unwrap();
        db.append_log("second").unwrap();

        let texts: Vec<String> = db.list_log().unwrap().into_iter().map(|e| e.text).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }
}
