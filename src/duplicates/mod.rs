//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Key-based grouping of file paths (single pass, first-seen order)
//! - Duplicate selection (groups with 2+ members)
//! - Scan orchestration over one directory

pub mod finder;
pub mod groups;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanSummary};
pub use groups::{
    group_paths, select_duplicates, DuplicateTable, Group, Grouping, GroupingStats,
};
