//! Single-level directory listing using walkdir.
//!
//! # Overview
//!
//! The [`Walker`] enumerates the regular files directly inside one directory.
//! Subdirectories are not descended into and symbolic links are not followed
//! or reported. Entries are sorted by file name so repeated scans of an
//! unchanged directory enumerate files in the same order.
//!
//! # Example
//!
//! ```no_run
//! use flatdupe::scanner::Walker;
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"));
//! walker.validate().unwrap();
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::WalkDir;

use super::ScanError;

/// Lister for the top-level files of one directory.
#[derive(Debug)]
pub struct Walker {
    /// Directory to list
    root: PathBuf,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given directory.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            root: path.to_path_buf(),
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the walker stops yielding entries.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Directory being listed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Check that the root exists and is a directory.
    ///
    /// # Errors
    ///
    /// - [`ScanError::NotFound`] if the path does not exist
    /// - [`ScanError::NotADirectory`] if it exists but is not a directory
    /// - [`ScanError::PermissionDenied`] / [`ScanError::Io`] if it cannot be inspected
    pub fn validate(&self) -> Result<(), ScanError> {
        let metadata = fs::metadata(&self.root).map_err(|e| ScanError::from_io(&self.root, e))?;
        if metadata.is_dir() {
            Ok(())
        } else {
            Err(ScanError::NotADirectory(self.root.clone()))
        }
    }

    /// List the regular files directly inside the root, sorted by name.
    ///
    /// Errors for individual entries are yielded as [`ScanError`] values
    /// rather than stopping iteration.
    pub fn walk(&self) -> impl Iterator<Item = Result<PathBuf, ScanError>> + '_ {
        WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .take_while(move |_| {
                let stop = self.is_shutdown_requested();
                if stop {
                    log::debug!("Walker: Shutdown requested, stopping iteration");
                }
                !stop
            })
            .filter_map(move |entry| match entry {
                Ok(entry) => {
                    let file_type = entry.file_type();
                    if file_type.is_file() {
                        Some(Ok(entry.into_path()))
                    } else {
                        log::trace!("Skipping non-regular entry: {}", entry.path().display());
                        None
                    }
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), Path::to_path_buf);
                    log::warn!("Failed to list {}: {}", path.display(), e);
                    let error = match e.into_io_error() {
                        Some(io) => ScanError::from_io(&path, io),
                        None => ScanError::Io {
                            path: path.clone(),
                            source: std::io::Error::other("filesystem loop detected"),
                        },
                    };
                    Some(Err(error))
                }
            })
    }
}
