//! Scanner module for directory listing, content hashing, and key extraction.
//!
//! This module provides functionality for:
//! - Listing the top-level regular files of a directory
//! - Streaming MD5 content digests
//! - Reducing a file path to a comparison key (digest or size)
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Single-level directory listing
//! - [`hasher`]: MD5 file hashing (streaming, fixed-size chunks)
//! - [`key`]: Comparison strategies and the key extractor
//!
//! # Example
//!
//! ```no_run
//! use flatdupe::scanner::{KeyExtractor, Strategy, Walker};
//! use std::path::Path;
//!
//! let extractor = KeyExtractor::new(Strategy::Hash);
//! let walker = Walker::new(Path::new("."));
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(path) => match extractor.extract(&path) {
//!             Ok(key) => println!("{key}  {}", path.display()),
//!             Err(e) => eprintln!("Warning: {e}"),
//!         },
//!         Err(e) => eprintln!("Warning: {e}"),
//!     }
//! }
//! ```

pub mod hasher;
pub mod key;
pub mod walker;

use std::io;
use std::path::{Path, PathBuf};

// Re-export main types
pub use hasher::{hash_to_hex, hex_to_hash, Hash, Hasher, DEFAULT_CHUNK_SIZE};
pub use key::{file_size, ComparisonKey, KeyExtractor, Strategy};
pub use walker::Walker;

/// Errors that can occur while listing the scanned directory.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while listing.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied(p)
            | Self::NotFound(p)
            | Self::NotADirectory(p)
            | Self::Io { path: p, .. } => p,
        }
    }

    /// Classify an I/O error raised for `path`.
    pub(crate) fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// Per-file failure while computing a comparison key.
///
/// These never abort a scan. The grouping engine records them next to the
/// groups so callers can report them separately from "no duplicates".
#[derive(thiserror::Error, Debug)]
pub enum KeyError {
    /// The file could not be opened, or a read failed mid-stream.
    #[error("Unreadable file {path}: {source}")]
    UnreadableFile {
        /// File that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The file's metadata could not be retrieved.
    #[error("Metadata unavailable for {path}: {source}")]
    MetadataUnavailable {
        /// File that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl KeyError {
    /// Path of the file that failed.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::UnreadableFile { path, .. } | Self::MetadataUnavailable { path, .. } => path,
        }
    }

    /// Kind of the underlying I/O error.
    #[must_use]
    pub fn io_kind(&self) -> io::ErrorKind {
        match self {
            Self::UnreadableFile { source, .. } | Self::MetadataUnavailable { source, .. } => {
                source.kind()
            }
        }
    }

    /// Short machine-readable name of the error kind.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::UnreadableFile { .. } => "unreadable_file",
            Self::MetadataUnavailable { .. } => "metadata_unavailable",
        }
    }

    pub(crate) fn not_a_file(path: &Path, metadata_stage: bool) -> Self {
        let source = io::Error::new(io::ErrorKind::InvalidInput, "not a regular file");
        if metadata_stage {
            Self::MetadataUnavailable {
                path: path.to_path_buf(),
                source,
            }
        } else {
            Self::UnreadableFile {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}
