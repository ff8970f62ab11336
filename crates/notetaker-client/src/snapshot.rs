//! The cached note table.
//!
//! A [`Snapshot`] is immutable once built; refreshing swaps in a new one, so a
//! reader holding an `Arc<Snapshot>` always sees a complete table.

use notetaker_shared::constants::{COLUMN_COUNT, TABLE_HEADER};
use notetaker_store::{ChangeStamp, NoteRow};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    version: u64,
    rows: Vec<NoteRow>,
    /// Change stamp read together with `rows`.
    stamp: Option<ChangeStamp>,
}

impl Snapshot {
    pub(crate) fn new(version: u64, rows: Vec<NoteRow>, stamp: Option<ChangeStamp>) -> Self {
        Self {
            version,
            rows,
            stamp,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn rows(&self) -> &[NoteRow] {
        &self.rows
    }

    pub fn stamp(&self) -> Option<ChangeStamp> {
        self.stamp
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        COLUMN_COUNT
    }

    pub fn row(&self, row: usize) -> Option<&NoteRow> {
        self.rows.get(row)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<String> {
        self.rows.get(row).and_then(|r| r.cell(col))
    }

    pub fn header(col: usize) -> Option<&'static str> {
        TABLE_HEADER.get(col).copied()
    }
}
