//! Durable record table: one row per roster subject plus result columns
//!
//! The table lives on disk as a CSV file whose header row is the roster
//! header followed by the four result columns, in fixed order. Column order
//! and presence are load-bearing: reload indexes by position and verifies
//! the result column names.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Header names of the result columns, appended after the roster columns.
pub const RESULT_COLUMNS: [&str; 4] = ["Attended", "Submit Time", "IP", "User Agent"];

/// Canonical mark for an accepted check-in.
pub const ATTENDED_MARK: &str = "X";

/// One roster subject plus its attendance outcome fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectRecord {
    /// Stable unique key (first roster column). Compared textually, so
    /// numeric-looking identifiers such as "007" and "7" stay distinct.
    pub identifier: String,
    /// Display name (second roster column)
    pub display_name: String,
    /// Further roster columns, carried through untouched
    pub extra: Vec<String>,
    /// Empty, the canonical mark, or a duplicate annotation
    pub marker: String,
    pub submit_time: String,
    pub origin_address: String,
    pub client_signature: String,
}

impl SubjectRecord {
    fn from_row(row: &csv::StringRecord, roster_width: usize) -> Result<Self> {
        if row.len() != roster_width + RESULT_COLUMNS.len() {
            return Err(Error::StoreUnavailable(format!(
                "malformed row with {} fields (expected {})",
                row.len(),
                roster_width + RESULT_COLUMNS.len()
            )));
        }
        Ok(Self {
            identifier: row[0].to_string(),
            display_name: row[1].to_string(),
            extra: (2..roster_width).map(|i| row[i].to_string()).collect(),
            marker: row[roster_width].to_string(),
            submit_time: row[roster_width + 1].to_string(),
            origin_address: row[roster_width + 2].to_string(),
            client_signature: row[roster_width + 3].to_string(),
        })
    }

    fn to_row(&self) -> Vec<&str> {
        let mut fields = Vec::with_capacity(2 + self.extra.len() + RESULT_COLUMNS.len());
        fields.push(self.identifier.as_str());
        fields.push(self.display_name.as_str());
        fields.extend(self.extra.iter().map(String::as_str));
        fields.push(self.marker.as_str());
        fields.push(self.submit_time.as_str());
        fields.push(self.origin_address.as_str());
        fields.push(self.client_signature.as_str());
        fields
    }
}

/// In-memory handle on the full durable table
#[derive(Debug, Clone)]
pub struct RecordTable {
    headers: Vec<String>,
    records: Vec<SubjectRecord>,
}

impl RecordTable {
    pub(crate) fn from_parts(headers: Vec<String>, records: Vec<SubjectRecord>) -> Self {
        Self { headers, records }
    }

    /// Read the full durable table into memory.
    ///
    /// Fails with [`Error::StoreUnavailable`] if the file is missing,
    /// unreadable, or its result columns are not the expected last four.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::StoreUnavailable(format!(
                "{} not found",
                path.display()
            )));
        }

        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| Error::StoreUnavailable(format!("{}: {}", path.display(), e)))?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| Error::StoreUnavailable(format!("{}: {}", path.display(), e)))?
            .iter()
            .map(str::to_string)
            .collect();

        if headers.len() < 2 + RESULT_COLUMNS.len() {
            return Err(Error::StoreUnavailable(format!(
                "{}: header has {} columns, expected at least {}",
                path.display(),
                headers.len(),
                2 + RESULT_COLUMNS.len()
            )));
        }

        let roster_width = headers.len() - RESULT_COLUMNS.len();
        let tail: Vec<&str> = headers[roster_width..].iter().map(String::as_str).collect();
        if tail != RESULT_COLUMNS {
            return Err(Error::StoreUnavailable(format!(
                "{}: result columns missing or out of order",
                path.display()
            )));
        }

        let mut records = Vec::new();
        for row in reader.records() {
            let row =
                row.map_err(|e| Error::StoreUnavailable(format!("{}: {}", path.display(), e)))?;
            records.push(SubjectRecord::from_row(&row, roster_width)?);
        }

        Ok(Self { headers, records })
    }

    /// First row whose identifier equals `identifier`, in table order.
    ///
    /// Comparison is case-sensitive string equality on the textual form.
    pub fn find_by_identifier(&self, identifier: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|record| record.identifier == identifier)
    }

    pub fn record(&self, index: usize) -> &SubjectRecord {
        &self.records[index]
    }

    pub fn record_mut(&mut self, index: usize) -> &mut SubjectRecord {
        &mut self.records[index]
    }

    pub fn records(&self) -> &[SubjectRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rewrite the whole durable table.
    ///
    /// Writes to a sibling temp file and renames it over the target, so a
    /// failed write leaves the prior content intact.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let tmp = path.with_extension("tmp");
        self.write_to(&tmp).map_err(Error::Persist)?;
        fs::rename(&tmp, path).map_err(Error::Persist)?;
        Ok(())
    }

    fn write_to(&self, path: &Path) -> std::io::Result<()> {
        let mut writer = csv::Writer::from_path(path).map_err(csv_io_error)?;
        writer.write_record(&self.headers).map_err(csv_io_error)?;
        for record in &self.records {
            writer.write_record(record.to_row()).map_err(csv_io_error)?;
        }
        writer.flush()
    }
}

fn csv_io_error(err: csv::Error) -> std::io::Error {
    match err.into_kind() {
        csv::ErrorKind::Io(io) => io,
        other => std::io::Error::new(std::io::ErrorKind::Other, format!("{:?}", other)),
    }
}
