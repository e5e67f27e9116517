//! CSV output formatter for duplicate tables.
//!
//! One row is generated for each file of each duplicate group.
//!
//! # Columns
//!
//! - `group_id`: 0-based index of the group in table order
//! - `key`: MD5 hex digest or decimal size, depending on the strategy
//! - `path`: Path of the file
//! - `role`: `keep` for the survivor, `delete` for redundant files
//!
//! # Example
//!
//! ```no_run
//! use flatdupe::duplicates::DuplicateFinder;
//! use flatdupe::output::csv::CsvOutput;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (table, _) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! CsvOutput::new(&table).write_to(std::io::stdout()).unwrap();
//! ```

use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::duplicates::DuplicateTable;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    group_id: usize,
    key: &'a str,
    path: String,
    role: &'static str,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    table: &'a DuplicateTable,
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(table: &'a DuplicateTable) -> Self {
        Self { table }
    }

    /// Write the CSV output, header included, to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for (group_id, group) in self.table.groups().iter().enumerate() {
            let key = group.key.to_string();
            for (i, path) in group.paths.iter().enumerate() {
                csv_writer.serialize(CsvRow {
                    group_id,
                    key: &key,
                    path: path.to_string_lossy().into_owned(),
                    role: if i == 0 { "keep" } else { "delete" },
                })?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
