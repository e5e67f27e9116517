//! File actions module.
//!
//! This module provides functionality for:
//! - Permanent removal of redundant duplicates (keep first, delete rest)
//! - The confirmation gate that must be passed before anything is removed
//!
//! # Deletion
//!
//! ```no_run
//! use flatdupe::actions::{execute_if_confirmed, DeleteConfig, Decision, NoopCallback};
//! use flatdupe::duplicates::DuplicateFinder;
//! use std::path::Path;
//!
//! let (table, _) = DuplicateFinder::with_defaults()
//!     .find_duplicates(Path::new("."))
//!     .unwrap();
//! let result =
//!     execute_if_confirmed::<NoopCallback>(&table, Decision::Confirmed, &DeleteConfig::default(), None);
//! ```

pub mod confirm;
pub mod delete;

// Re-export commonly used types
pub use confirm::prompt_confirmation;
pub use delete::{
    delete_duplicates, execute_if_confirmed, permanent_delete, plan_deletions,
    BatchDeleteResult, Decision, DeleteConfig, DeleteError, DeleteProgressCallback, DeleteResult,
    DeletionPlan, NoopCallback,
};
