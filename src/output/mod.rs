//! Output formatters for duplicate scan results.
//!
//! This module provides different output formats for scan results:
//! - A rounded console table for people
//! - JSON for automation and scripting
//! - CSV for spreadsheet import
//!
//! # Example
//!
//! ```no_run
//! use flatdupe::duplicates::DuplicateFinder;
//! use flatdupe::error::ExitCode;
//! use flatdupe::output::json::JsonOutput;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (table, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! let output = JsonOutput::new(&table, &summary, ExitCode::Success);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod csv;
pub mod json;
pub mod table;

// Re-export main types
pub use csv::{CsvOutput, CsvOutputError};
pub use json::JsonOutput;
pub use table::TableOutput;
