//! CSV export of the cached note table.

use std::io;
use std::path::Path;

use notetaker_shared::constants::TABLE_HEADER;
use notetaker_store::NoteRow;

use crate::error::Result;
use crate::state::NoteStore;

/// Write `rows` as CSV, header first.  Fields containing delimiters, quotes or
/// newlines are quoted.
pub fn write_csv<W: io::Write>(writer: W, rows: &[NoteRow]) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);

    csv.write_record(TABLE_HEADER)?;
    for row in rows {
        csv.write_record(row.cells())?;
    }
    csv.flush()?;
    Ok(())
}

/// Write `rows` to `path`, replacing any existing file.  Returns the number of
/// data rows written.
pub fn export_rows(path: &Path, rows: &[NoteRow]) -> Result<usize> {
    let file = std::fs::File::create(path)?;
    write_csv(io::BufWriter::new(file), rows)?;

    tracing::info!(path = %path.display(), rows = rows.len(), "exported notes");
    Ok(rows.len())
}

impl NoteStore {
    /// Export every cached row.  The database is not queried.
    pub fn export_all(&self, path: impl AsRef<Path>) -> Result<usize> {
        let snapshot = self.snapshot();
        export_rows(path.as_ref(), snapshot.rows())
    }

    /// Export a caller-selected subset, usually the rows left visible by a
    /// [`RowFilter`](crate::view::RowFilter).
    pub fn export_filtered(&self, path: impl AsRef<Path>, rows: &[NoteRow]) -> Result<usize> {
        export_rows(path.as_ref(), rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::{connected_store, NO_FILES};
    use crate::view::RowFilter;

    fn read_back(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .unwrap();
        let header = reader
            .headers()
            .unwrap()
            .iter()
            .map(str::to_string)
            .collect();
        let rows = reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();
        (header, rows)
    }

    #[test]
    fn export_all_matches_table() {
        let dir = tempfile::tempdir().unwrap();
        let file_a = dir.path().join("a.txt");
        let file_b = dir.path().join("b,c.txt");
        std::fs::write(&file_a, "a").unwrap();
        std::fs::write(&file_b, "b").unwrap();

        let store = connected_store(dir.path());
        store.commit_new_note("plain", "alice", NO_FILES).unwrap();
        store
            .commit_new_note("needs \"quotes\", commas\nand newlines", "bob", &[&file_a, &file_b])
            .unwrap();

        let out = dir.path().join("export.csv");
        assert_eq!(store.export_all(&out).unwrap(), 2);

        let (header, rows) = read_back(&out);
        assert_eq!(
            header,
            vec!["Creation Date", "Text", "User", "Last Modified", "Attachments"]
        );
        assert_eq!(rows.len(), store.row_count());
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                assert_eq!(Some(value.clone()), store.cell(r, c));
            }
        }
        assert_eq!(rows[1][4], "a.txt\nb,c.txt");
    }

    #[test]
    fn export_filtered_writes_subset() {
        let dir = tempfile::tempdir().unwrap();
        let store = connected_store(dir.path());
        store.commit_new_note("buy milk", "alice", NO_FILES).unwrap();
        store.commit_new_note("call plumber", "bob", NO_FILES).unwrap();
        store.commit_new_note("Milk the cow", "bob", NO_FILES).unwrap();

        let filter = RowFilter::wildcard("milk").unwrap();
        let visible = store.filtered_rows(&filter);

        let out = dir.path().join("filtered.csv");
        assert_eq!(store.export_filtered(&out, &visible).unwrap(), 2);

        let (_, rows) = read_back(&out);
        let texts: Vec<&str> = rows.iter().map(|r| r[1].as_str()).collect();
        assert_eq!(texts, vec!["buy milk", "Milk the cow"]);
    }

    #[test]
    fn export_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = connected_store(dir.path());
        let out = dir.path().join("out.csv");
        std::fs::write(&out, "stale content that is much longer than the new export\n".repeat(20))
            .unwrap();

        assert_eq!(store.export_all(&out).unwrap(), 0);
        let (header, rows) = read_back(&out);
        assert_eq!(header.len(), 5);
        assert!(rows.is_empty());
    }

    #[test]
    fn write_csv_to_memory() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[]).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Creation Date,Text,User,Last Modified,Attachments\r\n"
        );
    }
}
