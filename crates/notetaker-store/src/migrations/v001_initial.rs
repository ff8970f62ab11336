//! v001 -- Initial schema creation.
//!
//! Table and column names match the layout of existing note databases:
//! `user`, `note`, `attachment`, `note_attachment`, `log` and `updatetime`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Users
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS user (
    user_id  INTEGER PRIMARY KEY NOT NULL,
    username VARCHAR UNIQUE,
    pwhash   VARCHAR                      -- $pbkdf2-sha256$rounds$salt$checksum
);

-- ----------------------------------------------------------------
-- Notes
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS note (
    note_id     INTEGER PRIMARY KEY NOT NULL,
    datetime    DATETIME,                 -- creation time, local, microseconds
    text        VARCHAR,
    user        VARCHAR,                  -- FK -> user(username)
    last_update DATETIME,

    FOREIGN KEY (user) REFERENCES user(username)
);

CREATE INDEX IF NOT EXISTS idx_note_datetime ON note(datetime);

-- ----------------------------------------------------------------
-- Attachments
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS attachment (
    attach_id INTEGER PRIMARY KEY NOT NULL,
    name      VARCHAR,                    -- file name
    data      BLOB
);

CREATE TABLE IF NOT EXISTS note_attachment (
    id        INTEGER PRIMARY KEY NOT NULL,
    note_id   INTEGER,                    -- FK -> note(note_id)
    attach_id INTEGER                     -- FK -> attachment(attach_id)
);

CREATE INDEX IF NOT EXISTS idx_note_attachment_note ON note_attachment(note_id);

-- ----------------------------------------------------------------
-- Audit log and last-update marker
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS log (
    log_id    INTEGER PRIMARY KEY NOT NULL,
    timestamp DATETIME,
    text      VARCHAR
);

CREATE TABLE IF NOT EXISTS updatetime (
    updatetime DATETIME PRIMARY KEY NOT NULL
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
