//! Filtering and sorting of table rows.
//!
//! Filters use wildcard syntax (`*`, `?`, `[...]`), match case-insensitively
//! anywhere in the cell, and apply to the Text column unless told otherwise.

use std::cmp::Ordering;

use notetaker_shared::constants::TEXT_COLUMN;
use notetaker_store::NoteRow;
use regex::{Regex, RegexBuilder};

use crate::error::Result;
use crate::state::NoteStore;

#[derive(Debug, Clone)]
pub struct RowFilter {
    column: usize,
    pattern: Option<Regex>,
}

impl Default for RowFilter {
    fn default() -> Self {
        Self {
            column: TEXT_COLUMN,
            pattern: None,
        }
    }
}

impl RowFilter {
    /// Filter on the Text column.  An empty pattern matches every row.
    pub fn wildcard(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Ok(Self::default());
        }

        let regex = RegexBuilder::new(&wildcard_to_regex(pattern))
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            column: TEXT_COLUMN,
            pattern: Some(regex),
        })
    }

    pub fn on_column(mut self, column: usize) -> Self {
        self.column = column;
        self
    }

    pub fn is_active(&self) -> bool {
        self.pattern.is_some()
    }

    pub fn matches(&self, row: &NoteRow) -> bool {
        match &self.pattern {
            None => true,
            Some(re) => row.cell(self.column).is_some_and(|v| re.is_match(&v)),
        }
    }

    pub fn apply(&self, rows: &[NoteRow]) -> Vec<NoteRow> {
        rows.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Stable sort of `rows` by a table column.  Unknown columns leave the order
/// unchanged.
pub fn sort_rows(rows: &mut [NoteRow], column: usize, order: SortOrder) {
    let compare: fn(&NoteRow, &NoteRow) -> Ordering = match column {
        0 => |a, b| a.created_at.cmp(&b.created_at),
        1 => |a, b| a.text.cmp(&b.text),
        2 => |a, b| a.author.cmp(&b.author),
        3 => |a, b| a.last_updated_at.cmp(&b.last_updated_at),
        4 => |a, b| a.attachments.cmp(&b.attachments),
        _ => return,
    };

    match order {
        SortOrder::Ascending => rows.sort_by(compare),
        SortOrder::Descending => rows.sort_by(|a, b| compare(b, a)),
    }
}

impl NoteStore {
    /// Cached rows accepted by `filter`, in table order.
    pub fn filtered_rows(&self, filter: &RowFilter) -> Vec<NoteRow> {
        filter.apply(self.snapshot().rows())
    }
}

fn wildcard_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => {
                // copy the set if it is closed, otherwise treat '[' literally
                let rest: String = chars.clone().collect();
                match rest.find(']') {
                    Some(end) if end > 0 => {
                        let set = &rest[..end];
                        out.push('[');
                        for (i, sc) in set.chars().enumerate() {
                            match sc {
                                '!' if i == 0 => out.push('^'),
                                '\\' | '[' | '&' | '~' => {
                                    out.push('\\');
                                    out.push(sc);
                                }
                                _ => out.push(sc),
                            }
                        }
                        out.push(']');
                        for _ in 0..=set.chars().count() {
                            chars.next();
                        }
                    }
                    _ => out.push_str(&regex::escape("[")),
                }
            }
            other => out.push_str(&regex::escape(other.encode_utf8(&mut [0u8; 4]))),
        }
    }
    out
}
