//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`Progress`] struct which implements
//! [`ProgressCallback`] to display a progress bar while files are keyed, and
//! [`DeleteProgressCallback`] to print one line per deleted or failed file.

use std::path::Path;
use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::actions::{BatchDeleteResult, DeleteProgressCallback};

/// Progress callback for the scan phase.
///
/// Implement this trait to receive progress updates while files are keyed.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase (the strategy name, e.g. "hash")
    /// * `total` - Total number of items to process
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each item processed.
    ///
    /// # Arguments
    ///
    /// * `current` - Current item number (1-based)
    /// * `path` - Path being processed
    fn on_progress(&self, current: usize, path: &str);

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);
}

/// Terminal progress reporter.
pub struct Progress {
    bar: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, nothing is displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use flatdupe::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            quiet,
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    /// Print a line without corrupting an active bar.
    fn println(&self, line: &str) {
        if self.quiet {
            return;
        }
        match self.bar.lock().ok().as_deref().and_then(Option::as_ref) {
            Some(bar) => bar.println(line),
            None => eprintln!("{line}"),
        }
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        let bar = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::stderr());
        bar.set_style(Self::style());
        bar.set_message(match phase {
            "hash" => "Hashing".to_string(),
            "size" => "Reading sizes".to_string(),
            other => other.to_string(),
        });
        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(bar);
        }
    }

    fn on_progress(&self, current: usize, path: &str) {
        if let Ok(slot) = self.bar.lock() {
            if let Some(bar) = slot.as_ref() {
                bar.set_position(current as u64);
                log::trace!("Processing {}", truncate_path(path, 60));
            }
        }
    }

    fn on_phase_end(&self, _phase: &str) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        }
    }
}

impl DeleteProgressCallback for Progress {
    fn on_before_delete(&self, path: &Path, _index: usize, _total: usize) {
        log::debug!("Deleting {}", path.display());
    }

    fn on_delete_success(&self, path: &Path, _size: u64) {
        self.println(&format!("Deleted file: '{}'", path.display()));
    }

    fn on_delete_failure(&self, path: &Path, error: &str) {
        self.println(&format!("Failed to delete '{}': {}", path.display(), error));
    }

    fn on_complete(&self, result: &BatchDeleteResult) {
        self.println(&result.summary());
    }
}

/// Shorten a path for display, keeping its tail.
#[must_use]
pub fn truncate_path(path: &str, max_chars: usize) -> String {
    let count = path.chars().count();
    if count <= max_chars {
        return path.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let tail: String = path.chars().skip(count - keep).collect();
    format!("...{tail}")
}
