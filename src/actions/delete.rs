//! Duplicate removal: keep the first file of each group, delete the rest.
//!
//! # Overview
//!
//! For every group in a [`DuplicateTable`], the first path (first seen during
//! the scan) survives and every other path is permanently removed with
//! [`fs::remove_file`]. Each removal succeeds or fails on its own: a failure
//! is recorded and processing continues with the next target and group.
//!
//! Deletion is not transactional. There is no trash, no backup and no dry
//! run. If the process stops mid-way, some groups are processed and others
//! are untouched; a new scan rebuilds the table from what is on disk.
//!
//! # Example
//!
//! ```no_run
//! use flatdupe::actions::delete::{delete_duplicates, DeleteConfig, NoopCallback};
//! use flatdupe::duplicates::DuplicateFinder;
//! use std::path::Path;
//!
//! let (table, _) = DuplicateFinder::with_defaults()
//!     .find_duplicates(Path::new("."))
//!     .unwrap();
//! let result = delete_duplicates::<NoopCallback>(&table, &DeleteConfig::default(), None);
//! println!("{}", result.summary());
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytesize::ByteSize;
use thiserror::Error;

use crate::duplicates::{DuplicateTable, Group};

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The path is a directory, not a file.
    #[error("not a file: {0}")]
    NotAFile(PathBuf),

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Classify an I/O error raised for `path`.
    fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::NotAFile(p)
            | Self::Io { path: p, .. } => p,
        }
    }
}

/// Record of one removed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    /// Path that was deleted.
    pub path: PathBuf,
    /// Size of the deleted file in bytes.
    pub size: u64,
}

impl DeleteResult {
    /// Create a new delete result.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Results of a deletion run.
#[derive(Debug, Default)]
pub struct BatchDeleteResult {
    /// Successfully deleted files, in processing order.
    pub successes: Vec<DeleteResult>,
    /// Failed deletions, in processing order.
    pub failures: Vec<DeleteError>,
    /// Survivor paths that were kept.
    pub kept: Vec<PathBuf>,
    /// Total bytes freed.
    pub bytes_freed: u64,
    /// Whether the run stopped early on a shutdown request.
    pub interrupted: bool,
}

impl BatchDeleteResult {
    /// Number of successful deletions.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    /// Number of failed deletions.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Total number of attempted deletions.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    /// Check if all deletions succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        let freed = ByteSize::b(self.bytes_freed);
        let mut summary = if self.all_succeeded() {
            format!("Deleted {} file(s), freed {}", self.success_count(), freed)
        } else {
            format!(
                "Deleted {} file(s), {} failed, freed {}",
                self.success_count(),
                self.failure_count(),
                freed
            )
        };
        if self.interrupted {
            summary.push_str(" (interrupted)");
        }
        summary
    }
}

/// Configuration for deletion runs.
#[derive(Debug, Clone, Default)]
pub struct DeleteConfig {
    /// Optional shutdown flag, checked before each target.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
}

impl DeleteConfig {
    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Callback trait for deletion progress reporting.
pub trait DeleteProgressCallback: Send + Sync {
    /// Called before each file deletion.
    fn on_before_delete(&self, path: &Path, index: usize, total: usize);

    /// Called after successful deletion.
    fn on_delete_success(&self, path: &Path, size: u64);

    /// Called after failed deletion.
    fn on_delete_failure(&self, path: &Path, error: &str);

    /// Called when the run completes.
    fn on_complete(&self, result: &BatchDeleteResult);
}

/// Callback that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCallback;

impl DeleteProgressCallback for NoopCallback {
    fn on_before_delete(&self, _path: &Path, _index: usize, _total: usize) {}
    fn on_delete_success(&self, _path: &Path, _size: u64) {}
    fn on_delete_failure(&self, _path: &Path, _error: &str) {}
    fn on_complete(&self, _result: &BatchDeleteResult) {}
}

/// Survivor and removal targets for one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionPlan {
    /// The kept path (first in the group).
    pub survivor: PathBuf,
    /// Paths to remove, in group order.
    pub targets: Vec<PathBuf>,
}

impl DeletionPlan {
    /// Plan the removal of every path but the first.
    ///
    /// Entries equal to the survivor path are never targeted.
    #[must_use]
    pub fn for_group(group: &Group) -> Option<Self> {
        let survivor = group.survivor()?.to_path_buf();
        let targets = group
            .redundant()
            .iter()
            .filter(|p| {
                let same = p.as_path() == survivor.as_path();
                if same {
                    log::warn!(
                        "Not deleting {}: same path as the kept file",
                        survivor.display()
                    );
                }
                !same
            })
            .cloned()
            .collect();
        Some(Self { survivor, targets })
    }
}

/// Plan every group of the table, in table order.
#[must_use]
pub fn plan_deletions(table: &DuplicateTable) -> Vec<DeletionPlan> {
    table.groups().iter().filter_map(DeletionPlan::for_group).collect()
}

/// Permanently delete a single file.
///
/// **WARNING**: This operation cannot be undone.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if deletion is not allowed
/// - `NotAFile` if the path is a directory
/// - `Io` for any other failure
pub fn permanent_delete(path: &Path) -> Result<DeleteResult, DeleteError> {
    let metadata = fs::symlink_metadata(path).map_err(|e| DeleteError::from_io(path, e))?;
    if metadata.is_dir() {
        return Err(DeleteError::NotAFile(path.to_path_buf()));
    }
    let size = metadata.len();

    fs::remove_file(path).map_err(|e| {
        log::error!("Delete failed for {}: {}", path.display(), e);
        DeleteError::from_io(path, e)
    })?;

    log::info!("Deleted: {} ({} bytes)", path.display(), size);
    Ok(DeleteResult::new(path.to_path_buf(), size))
}

/// Delete every non-survivor file of every group.
///
/// Never deletes a survivor, never deletes a path outside the table, and
/// never deletes more than `group.len() - 1` files per group. Failures are
/// recorded and do not stop the run.
pub fn delete_duplicates<C: DeleteProgressCallback>(
    table: &DuplicateTable,
    config: &DeleteConfig,
    callback: Option<&C>,
) -> BatchDeleteResult {
    let plans = plan_deletions(table);
    let total: usize = plans.iter().map(|p| p.targets.len()).sum();
    let mut result = BatchDeleteResult::default();
    let mut index = 0;

    log::info!(
        "Deleting {} redundant file(s) across {} group(s)",
        total,
        plans.len()
    );

    'groups: for plan in plans {
        log::debug!("Keeping {}", plan.survivor.display());
        result.kept.push(plan.survivor);

        for path in plan.targets {
            if config.is_shutdown_requested() {
                log::info!("Deletion interrupted after {} of {} file(s)", index, total);
                result.interrupted = true;
                break 'groups;
            }

            if let Some(cb) = callback {
                cb.on_before_delete(&path, index, total);
            }
            index += 1;

            match permanent_delete(&path) {
                Ok(deleted) => {
                    result.bytes_freed += deleted.size;
                    if let Some(cb) = callback {
                        cb.on_delete_success(&deleted.path, deleted.size);
                    }
                    result.successes.push(deleted);
                }
                Err(e) => {
                    log::warn!("Failed to delete {}: {}", path.display(), e);
                    if let Some(cb) = callback {
                        cb.on_delete_failure(&path, &e.to_string());
                    }
                    result.failures.push(e);
                }
            }
        }
    }

    if let Some(cb) = callback {
        cb.on_complete(&result);
    }
    log::info!("{}", result.summary());

    result
}

/// Outcome of the external confirmation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Proceed with deletion.
    Confirmed,
    /// Leave every file in place.
    Declined,
}

impl Decision {
    /// Whether deletion may proceed.
    #[must_use]
    pub fn is_confirmed(self) -> bool {
        self == Self::Confirmed
    }
}

/// Run [`delete_duplicates`] only when `decision` is [`Decision::Confirmed`].
pub fn execute_if_confirmed<C: DeleteProgressCallback>(
    table: &DuplicateTable,
    decision: Decision,
    config: &DeleteConfig,
    callback: Option<&C>,
) -> Option<BatchDeleteResult> {
    if decision.is_confirmed() {
        Some(delete_duplicates(table, config, callback))
    } else {
        log::info!("Deletion declined; no files removed");
        None
    }
}
