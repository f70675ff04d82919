//! Roster loading and record table bootstrap
//!
//! The roster source is a CSV file with a header row and at least an
//! identifier column and a display-name column, one row per subject.

use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::table::{RecordTable, SubjectRecord, RESULT_COLUMNS};

/// Create the durable record table from the roster, unless it already exists.
///
/// Bootstrap contract: call exactly once before any record operation.
/// Returns `true` when the table was created, `false` when an existing table
/// was left untouched.
pub fn ensure_record_table(roster_path: &Path, table_path: &Path) -> Result<bool> {
    if table_path.exists() {
        debug!("Record table already exists: {}", table_path.display());
        return Ok(false);
    }
    initialize(roster_path, table_path)?;
    Ok(true)
}

/// Build the record table from the roster source and write it to storage.
///
/// Appends the four result columns, initialized empty, to every row in
/// roster order. Overwrites any existing table file.
pub fn initialize(roster_path: &Path, table_path: &Path) -> Result<()> {
    if !roster_path.exists() {
        return Err(Error::MissingRoster(roster_path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(roster_path)
        .map_err(|e| Error::InvalidRoster(format!("{}: {}", roster_path.display(), e)))?;

    let mut headers: Vec<String> = reader
        .headers()
        .map_err(|e| Error::InvalidRoster(format!("{}: {}", roster_path.display(), e)))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.len() < 2 {
        return Err(Error::InvalidRoster(format!(
            "{}: need an identifier column and a display-name column",
            roster_path.display()
        )));
    }
    headers.extend(RESULT_COLUMNS.iter().map(|c| c.to_string()));

    let mut records = Vec::new();
    for row in reader.records() {
        let row =
            row.map_err(|e| Error::InvalidRoster(format!("{}: {}", roster_path.display(), e)))?;
        records.push(SubjectRecord {
            identifier: row[0].to_string(),
            display_name: row[1].to_string(),
            extra: (2..row.len()).map(|i| row[i].to_string()).collect(),
            marker: String::new(),
            submit_time: String::new(),
            origin_address: String::new(),
            client_signature: String::new(),
        });
    }

    let table = RecordTable::from_parts(headers, records);
    table.persist(table_path)?;
    info!(
        "Initialized record table {} from roster {} ({} subjects)",
        table_path.display(),
        roster_path.display(),
        table.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_missing_roster() {
        let dir = TempDir::new().unwrap();
        let result = initialize(&dir.path().join("input.csv"), &dir.path().join("output.csv"));
        assert!(matches!(result, Err(Error::MissingRoster(_))));
    }

    #[test]
    fn test_initialize_roster_too_narrow() {
        let dir = TempDir::new().unwrap();
        let roster = dir.path().join("input.csv");
        fs::write(&roster, "Student ID\nS1\n").unwrap();

        let result = initialize(&roster, &dir.path().join("output.csv"));
        assert!(matches!(result, Err(Error::InvalidRoster(_))));
    }

    #[test]
    fn test_initialize_appends_result_columns() {
        let dir = TempDir::new().unwrap();
        let roster = dir.path().join("input.csv");
        let table_path = dir.path().join("output.csv");
        fs::write(&roster, "Student ID,Student Name\nS1,Alice\nS2,Bob\n").unwrap();

        initialize(&roster, &table_path).unwrap();

        let contents = fs::read_to_string(&table_path).unwrap();
        let header = contents.lines().next().unwrap();
        assert_eq!(
            header,
            "Student ID,Student Name,Attended,Submit Time,IP,User Agent"
        );

        let table = RecordTable::load(&table_path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.record(1).identifier, "S2");
        assert_eq!(table.record(1).marker, "");
    }

    #[test]
    fn test_ensure_skips_existing_table() {
        let dir = TempDir::new().unwrap();
        let roster = dir.path().join("input.csv");
        let table_path = dir.path().join("output.csv");
        fs::write(&roster, "Student ID,Student Name\nS1,Alice\n").unwrap();

        assert!(ensure_record_table(&roster, &table_path).unwrap());
        let before = fs::read(&table_path).unwrap();

        // Second call must leave the existing table byte-for-byte untouched
        assert!(!ensure_record_table(&roster, &table_path).unwrap());
        assert_eq!(fs::read(&table_path).unwrap(), before);
    }

    #[test]
    fn test_ensure_without_roster_or_table() {
        let dir = TempDir::new().unwrap();
        let result =
            ensure_record_table(&dir.path().join("input.csv"), &dir.path().join("output.csv"));
        assert!(matches!(result, Err(Error::MissingRoster(_))));
    }
}
