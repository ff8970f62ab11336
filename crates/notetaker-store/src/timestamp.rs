//! Timestamp helpers.
//!
//! Timestamps are naive local times stored as TEXT with microsecond
//! precision, so a value read back compares equal to the one written.

use chrono::{Local, NaiveDateTime, Timelike};
use notetaker_shared::constants::TIMESTAMP_FORMAT;
use rusqlite::types::ValueRef;

/// Current local time truncated to microseconds.
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    let micros = now.nanosecond() / 1_000;
    now.with_nanosecond(micros * 1_000).unwrap_or(now)
}

pub fn format(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp.  The fractional part is optional.
pub fn parse(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
}

/// Parse the timestamp in column `idx`, mapping failures to a rusqlite
/// conversion error so it can be used inside row mappers.
pub(crate) fn column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let raw: String = row.get(idx)?;
    parse(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Lenient variant of [`column`] for note timestamps, which older writers
/// may have left NULL.  NULL reads as `None`; a value that is not a
/// parseable timestamp is logged and also read as `None`.
pub(crate) fn optional_column(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<NaiveDateTime>> {
    let raw = match row.get_ref(idx)? {
        ValueRef::Null => return Ok(None),
        ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        other => {
            tracing::warn!(column = idx, kind = %other.data_type(), "ignoring non-text timestamp");
            return Ok(None);
        }
    };

    match parse(&raw) {
        Ok(ts) => Ok(Some(ts)),
        Err(e) => {
            tracing::warn!(column = idx, value = %raw, error = %e, "ignoring unparseable timestamp");
            Ok(None)
        }
    }
}
