//! JSON output formatter for scan (and deletion) results.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "strategy": "hash",
//!   "duplicates": [
//!     {
//!       "key": "02129bb861061d1a052c592e2dc6b383",
//!       "survivor": "/dir/a.txt",
//!       "redundant": ["/dir/b.txt"]
//!     }
//!   ],
//!   "errors": [
//!     { "path": "/dir/locked.bin", "kind": "unreadable_file", "message": "..." }
//!   ],
//!   "summary": {
//!     "total_files": 3,
//!     "distinct_keys": 2,
//!     "duplicate_groups": 1,
//!     "redundant_files": 1,
//!     "error_count": 1,
//!     "scan_duration_ms": 2,
//!     "exit_code": 3,
//!     "exit_code_name": "FD003"
//!   },
//!   "deletion": null
//! }
//! ```

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::actions::BatchDeleteResult;
use crate::duplicates::{DuplicateTable, Group, ScanSummary};
use crate::error::ExitCode;
use crate::scanner::Strategy;

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// Hex digest or decimal size
    pub key: String,
    /// Path kept by deletion
    pub survivor: String,
    /// Paths removed by deletion
    pub redundant: Vec<String>,
}

impl JsonDuplicateGroup {
    /// Convert a group.
    #[must_use]
    pub fn from_group(group: &Group) -> Self {
        Self {
            key: group.key.to_string(),
            survivor: group.survivor().map(path_string).unwrap_or_default(),
            redundant: group.redundant().iter().map(|p| path_string(p)).collect(),
        }
    }
}

/// A per-file failure in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonError {
    /// Path that failed
    pub path: String,
    /// Machine-readable error kind
    pub kind: String,
    /// Human-readable message
    pub message: String,
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Files consumed from the listing
    pub total_files: usize,
    /// Distinct comparison keys
    pub distinct_keys: usize,
    /// Groups with 2+ files
    pub duplicate_groups: usize,
    /// Files deletion would remove
    pub redundant_files: usize,
    /// Failures recorded during the scan
    pub error_count: usize,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "FD000")
    pub exit_code_name: String,
}

/// Deletion report in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDeletion {
    /// Paths removed
    pub deleted: Vec<String>,
    /// Paths kept as survivors
    pub kept: Vec<String>,
    /// Removal failures
    pub failed: Vec<JsonError>,
    /// Bytes freed
    pub bytes_freed: u64,
    /// Whether deletion stopped early
    pub interrupted: bool,
}

impl JsonDeletion {
    /// Convert a deletion result.
    #[must_use]
    pub fn from_result(result: &BatchDeleteResult) -> Self {
        Self {
            deleted: result.successes.iter().map(|d| path_string(&d.path)).collect(),
            kept: result.kept.iter().map(|p| path_string(p)).collect(),
            failed: result
                .failures
                .iter()
                .map(|e| JsonError {
                    path: path_string(e.path()),
                    kind: "deletion_failed".to_string(),
                    message: e.to_string(),
                })
                .collect(),
            bytes_freed: result.bytes_freed,
            interrupted: result.interrupted,
        }
    }
}

/// Complete JSON output document.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Strategy used
    pub strategy: Strategy,
    /// Duplicate groups in table order
    pub duplicates: Vec<JsonDuplicateGroup>,
    /// Listing and key extraction failures
    pub errors: Vec<JsonError>,
    /// Summary statistics
    pub summary: JsonSummary,
    /// Deletion report, when deletion ran
    pub deletion: Option<JsonDeletion>,
}

impl JsonOutput {
    /// Build the output for a finished scan.
    #[must_use]
    pub fn new(table: &DuplicateTable, summary: &ScanSummary, exit_code: ExitCode) -> Self {
        let key_errors = summary.scan_errors.iter().map(|e| JsonError {
            path: path_string(e.path()),
            kind: e.kind_name().to_string(),
            message: e.to_string(),
        });
        let listing_errors = summary.listing_errors.iter().map(|e| JsonError {
            path: path_string(e.path()),
            kind: "listing_failed".to_string(),
            message: e.to_string(),
        });

        Self {
            strategy: summary.strategy,
            duplicates: table
                .groups()
                .iter()
                .map(JsonDuplicateGroup::from_group)
                .collect(),
            errors: listing_errors.chain(key_errors).collect(),
            summary: JsonSummary {
                total_files: summary.total_files,
                distinct_keys: summary.distinct_keys,
                duplicate_groups: summary.duplicate_groups,
                redundant_files: summary.redundant_files,
                error_count: summary.error_count(),
                scan_duration_ms: u64::try_from(summary.scan_duration.as_millis())
                    .unwrap_or(u64::MAX),
                exit_code: exit_code.as_i32(),
                exit_code_name: exit_code.code_prefix().to_string(),
            },
            deletion: None,
        }
    }

    /// Attach a deletion report.
    #[must_use]
    pub fn with_deletion(mut self, result: &BatchDeleteResult) -> Self {
        self.deletion = Some(JsonDeletion::from_result(result));
        self
    }

    /// Serialize to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns a serialization error (not expected for this document).
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns a serialization error (not expected for this document).
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty-printed JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns any serialization or I/O error.
    pub fn write_to<W: Write>(&self, mut writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer).map_err(serde_json::Error::io)
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
