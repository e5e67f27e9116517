//! Scan orchestration: listing, keying, grouping, and selection.
//!
//! # Overview
//!
//! [`DuplicateFinder`] runs one scan of one directory:
//! 1. **Validate** the directory and list its top-level regular files
//! 2. **Key** each file with the configured strategy (digest or size)
//! 3. **Group** files by key and **select** groups with 2+ members
//!
//! Per-file failures are collected into the [`ScanSummary`]; they never
//! abort the scan.
//!
//! # Example
//!
//! ```no_run
//! use flatdupe::duplicates::{DuplicateFinder, FinderConfig};
//! use flatdupe::scanner::Strategy;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default().with_strategy(Strategy::Size));
//! let (table, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! println!("{} duplicate groups, {} errors", table.len(), summary.error_count());
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::groups::{select_duplicates, DuplicateTable, Grouping};
use crate::progress::ProgressCallback;
use crate::scanner::{KeyError, KeyExtractor, ScanError, Strategy, Walker, DEFAULT_CHUNK_SIZE};

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Comparison strategy.
    pub strategy: Strategy,
    /// Read chunk size for content hashing.
    pub chunk_size: usize,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("strategy", &self.strategy)
            .field("chunk_size", &self.chunk_size)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Hash,
            chunk_size: DEFAULT_CHUNK_SIZE,
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the comparison strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the hashing chunk size (clamped to at least 1 byte).
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Outcome details of a scan, reported alongside the duplicate table.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Strategy used for the scan
    pub strategy: Strategy,
    /// Files consumed from the enumeration
    pub total_files: usize,
    /// Distinct keys among successfully keyed files
    pub distinct_keys: usize,
    /// Groups with 2+ files
    pub duplicate_groups: usize,
    /// Files the deletion policy would remove
    pub redundant_files: usize,
    /// Per-file key extraction failures
    pub scan_errors: Vec<KeyError>,
    /// Directory entries that could not be listed
    pub listing_errors: Vec<ScanError>,
    /// Wall-clock duration of the scan
    pub scan_duration: Duration,
}

impl ScanSummary {
    /// Total number of recorded failures.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.scan_errors.len() + self.listing_errors.len()
    }

    /// Whether any failure was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}

/// Errors that stop a scan as a whole.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by a shutdown request.
    #[error("Scan interrupted by user")]
    Interrupted,

    /// The scan root does not exist.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The scan root is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The scan root could not be inspected.
    #[error(transparent)]
    Scan(ScanError),
}

impl From<ScanError> for FinderError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::NotFound(p) => Self::NotFound(p),
            ScanError::NotADirectory(p) => Self::NotADirectory(p),
            other => Self::Scan(other),
        }
    }
}

/// Duplicate finder for a single directory.
#[derive(Debug, Clone, Default)]
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a finder comparing by content hash with default settings.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Find duplicates among the top-level files of `dir`.
    ///
    /// # Errors
    ///
    /// - [`FinderError::NotFound`] / [`FinderError::NotADirectory`] for a bad root
    /// - [`FinderError::Interrupted`] if shutdown is requested mid-scan
    pub fn find_duplicates(
        &self,
        dir: &Path,
    ) -> Result<(DuplicateTable, ScanSummary), FinderError> {
        let start = Instant::now();
        let mut walker = Walker::new(dir);
        if let Some(flag) = &self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(Arc::clone(flag));
        }
        walker.validate()?;

        log::info!("Scanning {} by {}", dir.display(), self.config.strategy);

        let mut files = Vec::new();
        let mut listing_errors = Vec::new();
        for entry in walker.walk() {
            match entry {
                Ok(path) => files.push(path),
                Err(e) => listing_errors.push(e),
            }
        }
        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }
        log::debug!("Listed {} files in {}", files.len(), dir.display());

        let (table, mut summary) = self.find_duplicates_in_paths(files)?;
        summary.listing_errors = listing_errors;
        summary.scan_duration = start.elapsed();
        Ok((table, summary))
    }

    /// Find duplicates among a caller-supplied enumeration of file paths.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Interrupted`] if shutdown is requested mid-scan.
    pub fn find_duplicates_in_paths(
        &self,
        paths: impl IntoIterator<Item = PathBuf>,
    ) -> Result<(DuplicateTable, ScanSummary), FinderError> {
        let start = Instant::now();
        let grouping = self.group(paths.into_iter().collect())?;
        let table = select_duplicates(&grouping);
        let stats = grouping.stats();

        let summary = ScanSummary {
            strategy: self.config.strategy,
            total_files: stats.total_files,
            distinct_keys: stats.distinct_keys,
            duplicate_groups: stats.duplicate_groups,
            redundant_files: stats.redundant_files,
            scan_errors: grouping.into_parts().1,
            listing_errors: Vec::new(),
            scan_duration: start.elapsed(),
        };

        log::info!(
            "Scan complete: {} files, {} duplicate groups, {} redundant, {} errors",
            summary.total_files,
            summary.duplicate_groups,
            summary.redundant_files,
            summary.error_count()
        );

        Ok((table, summary))
    }

    fn group(&self, paths: Vec<PathBuf>) -> Result<Grouping, FinderError> {
        let extractor =
            KeyExtractor::with_chunk_size(self.config.strategy, self.config.chunk_size);
        let callback = self.config.progress_callback.as_ref();
        let phase = self.config.strategy.to_string();

        if let Some(cb) = callback {
            cb.on_phase_start(&phase, paths.len());
        }

        let mut grouping = Grouping::new();
        for (idx, path) in paths.into_iter().enumerate() {
            if self.config.is_shutdown_requested() {
                log::info!("Scan interrupted after {} files", idx);
                if let Some(cb) = callback {
                    cb.on_phase_end(&phase);
                }
                return Err(FinderError::Interrupted);
            }
            if let Some(cb) = callback {
                cb.on_progress(idx + 1, path.to_string_lossy().as_ref());
            }
            let key = extractor.extract(&path);
            grouping.add(path, key);
        }

        if let Some(cb) = callback {
            cb.on_phase_end(&phase);
        }
        Ok(grouping)
    }
}
