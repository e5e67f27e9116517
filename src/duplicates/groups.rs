//! Key-based grouping and duplicate selection.
//!
//! # Overview
//!
//! [`group_paths`] makes a single pass over an enumeration of file paths,
//! computes each path's [`ComparisonKey`] and appends the path to the group
//! for that key. Paths whose key cannot be computed are kept in a separate
//! error list, so every input path ends up in exactly one place.
//!
//! [`select_duplicates`] then narrows the grouping to groups with two or
//! more members, producing the [`DuplicateTable`].
//!
//! Both keep first-seen order: groups appear in the order their key was first
//! produced, and paths within a group appear in enumeration order. The first
//! path of a group is its survivor when duplicates are deleted.
//!
//! # Example
//!
//! ```no_run
//! use flatdupe::duplicates::{group_paths, select_duplicates};
//! use flatdupe::scanner::{KeyExtractor, Strategy};
//! use std::path::PathBuf;
//!
//! let paths = vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")];
//! let grouping = group_paths(paths, &KeyExtractor::new(Strategy::Hash));
//! let table = select_duplicates(&grouping);
//!
//! for (key, group) in table.iter() {
//!     println!("{key}: keep {}", group.paths[0].display());
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::scanner::{ComparisonKey, KeyError, KeyExtractor};

/// Ordered paths sharing one comparison key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Key shared by every path in this group
    pub key: ComparisonKey,
    /// Paths in enumeration order; never empty
    pub paths: Vec<PathBuf>,
}

impl Group {
    /// Create a group holding its first path.
    #[must_use]
    pub fn new(key: ComparisonKey, first: PathBuf) -> Self {
        Self {
            key,
            paths: vec![first],
        }
    }

    /// Append a path.
    pub fn push(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    /// Number of paths in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Check if this group holds duplicates (2+ paths).
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.paths.len() > 1
    }

    /// The path kept by the deletion policy (first seen).
    #[must_use]
    pub fn survivor(&self) -> Option<&Path> {
        self.paths.first().map(PathBuf::as_path)
    }

    /// Every path except the survivor.
    #[must_use]
    pub fn redundant(&self) -> &[PathBuf] {
        self.paths.get(1..).unwrap_or_default()
    }
}

/// Statistics from a grouping pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Paths consumed from the enumeration
    pub total_files: usize,
    /// Paths placed into a group
    pub grouped_files: usize,
    /// Paths whose key extraction failed
    pub failed_files: usize,
    /// Number of distinct keys
    pub distinct_keys: usize,
    /// Groups with 2+ paths
    pub duplicate_groups: usize,
    /// Paths beyond the first in every duplicate group
    pub redundant_files: usize,
}

/// Result of a grouping pass: every key's group plus per-file errors.
#[derive(Debug, Default)]
pub struct Grouping {
    groups: Vec<Group>,
    index: HashMap<ComparisonKey, usize>,
    errors: Vec<KeyError>,
}

impl Grouping {
    /// Create an empty grouping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one path with the outcome of its key extraction.
    ///
    /// A key appends the path to its group (creating the group if needed);
    /// an error is stored and the path joins no group.
    pub fn add(&mut self, path: PathBuf, key: Result<ComparisonKey, KeyError>) {
        match key {
            Ok(key) => {
                if let Some(&idx) = self.index.get(&key) {
                    self.groups[idx].push(path);
                } else {
                    self.index.insert(key, self.groups.len());
                    self.groups.push(Group::new(key, path));
                }
            }
            Err(e) => {
                log::warn!("Skipping {}: {}", path.display(), e);
                self.errors.push(e);
            }
        }
    }

    /// All groups in key-first-seen order, including single-member groups.
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Group for `key`, if any path produced it.
    #[must_use]
    pub fn get(&self, key: &ComparisonKey) -> Option<&Group> {
        self.index.get(key).map(|&idx| &self.groups[idx])
    }

    /// Per-file key extraction failures, in enumeration order.
    #[must_use]
    pub fn errors(&self) -> &[KeyError] {
        &self.errors
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if no path was grouped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Compute statistics for this grouping.
    #[must_use]
    pub fn stats(&self) -> GroupingStats {
        let grouped_files: usize = self.groups.iter().map(Group::len).sum();
        let duplicates = self.groups.iter().filter(|g| g.has_duplicates());

        GroupingStats {
            total_files: grouped_files + self.errors.len(),
            grouped_files,
            failed_files: self.errors.len(),
            distinct_keys: self.groups.len(),
            duplicate_groups: duplicates.clone().count(),
            redundant_files: duplicates.map(|g| g.len() - 1).sum(),
        }
    }

    /// Split into the full group list and the error list.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Group>, Vec<KeyError>) {
        (self.groups, self.errors)
    }
}

/// Duplicate groups (2+ members each) in key-first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateTable {
    groups: Vec<Group>,
}

impl DuplicateTable {
    /// Build a table from groups, dropping any with fewer than two paths.
    #[must_use]
    pub fn from_groups(groups: impl IntoIterator<Item = Group>) -> Self {
        Self {
            groups: groups.into_iter().filter(Group::has_duplicates).collect(),
        }
    }

    /// Iterate `(key, group)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&ComparisonKey, &Group)> {
        self.groups.iter().map(|g| (&g.key, g))
    }

    /// Groups in order.
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Group for `key`, if it holds duplicates.
    #[must_use]
    pub fn get(&self, key: &ComparisonKey) -> Option<&Group> {
        self.groups.iter().find(|g| &g.key == key)
    }

    /// Number of duplicate groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if no duplicates were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total paths across all groups.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    /// Paths that the deletion policy would remove.
    #[must_use]
    pub fn redundant_count(&self) -> usize {
        self.groups.iter().map(|g| g.redundant().len()).sum()
    }

    /// Consume the table into its groups.
    #[must_use]
    pub fn into_groups(self) -> Vec<Group> {
        self.groups
    }
}

/// Group paths by the key `extractor` computes for each (single pass).
///
/// Extraction failures are recorded in [`Grouping::errors`] and never abort
/// the pass. Identical paths in the input are not deduplicated.
#[must_use]
pub fn group_paths<I, P>(paths: I, extractor: &KeyExtractor) -> Grouping
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let mut grouping = Grouping::new();
    for path in paths {
        let path = path.into();
        let key = extractor.extract(&path);
        log::trace!("Keyed {}", path.display());
        grouping.add(path, key);
    }

    let stats = grouping.stats();
    log::debug!(
        "Grouped {} files into {} keys ({} failed)",
        stats.total_files,
        stats.distinct_keys,
        stats.failed_files
    );
    grouping
}

/// Keep only groups with two or more paths. Pure; no I/O.
#[must_use]
pub fn select_duplicates(grouping: &Grouping) -> DuplicateTable {
    let table = DuplicateTable::from_groups(grouping.groups().iter().cloned());
    log::debug!(
        "Selected {} duplicate groups out of {} keys",
        table.len(),
        grouping.len()
    );
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Strategy;
    use std::fs;
    use std::io;
    use tempfile::TempDir;

    fn size_key(n: u64) -> ComparisonKey {
        ComparisonKey::Size(n)
    }

    fn missing(path: &str) -> KeyError {
        KeyError::MetadataUnavailable {
            path: PathBuf::from(path),
            source: io::Error::from(io::ErrorKind::NotFound),
        }
    }

    #[test]
    fn test_group_survivor_and_redundant() {
        let mut group = Group::new(size_key(1), PathBuf::from("/a"));
        assert_eq!(group.survivor(), Some(Path::new("/a")));
        assert!(group.redundant().is_empty());
        assert!(!group.has_duplicates());

        group.push(PathBuf::from("/b"));
        group.push(PathBuf::from("/c"));
        assert_eq!(group.len(), 3);
        assert_eq!(
            group.redundant(),
            &[PathBuf::from("/b"), PathBuf::from("/c")]
        );
    }

    #[test]
    fn test_grouping_add_preserves_order() {
        let mut grouping = Grouping::new();
        grouping.add(PathBuf::from("/x1"), Ok(size_key(200)));
        grouping.add(PathBuf::from("/y1"), Ok(size_key(100)));
        grouping.add(PathBuf::from("/x2"), Ok(size_key(200)));
        grouping.add(PathBuf::from("/bad"), Err(missing("/bad")));
        grouping.add(PathBuf::from("/y2"), Ok(size_key(100)));

        let keys: Vec<_> = grouping.groups().iter().map(|g| g.key).collect();
        assert_eq!(keys, vec![size_key(200), size_key(100)]);
        assert_eq!(
            grouping.get(&size_key(200)).unwrap().paths,
            vec![PathBuf::from("/x1"), PathBuf::from("/x2")]
        );
        assert_eq!(grouping.errors().len(), 1);
        assert_eq!(grouping.errors()[0].path(), Path::new("/bad"));
    }

    #[test]
    fn test_grouping_stats() {
        let mut grouping = Grouping::new();
        for (path, size) in [("/a", 1), ("/b", 1), ("/c", 1), ("/d", 2), ("/e", 3), ("/f", 3)] {
            grouping.add(PathBuf::from(path), Ok(size_key(size)));
        }
        grouping.add(PathBuf::from("/g"), Err(missing("/g")));

        let stats = grouping.stats();
        assert_eq!(stats.total_files, 7);
        assert_eq!(stats.grouped_files, 6);
        assert_eq!(stats.failed_files, 1);
        assert_eq!(stats.distinct_keys, 3);
        assert_eq!(stats.duplicate_groups, 2);
        assert_eq!(stats.redundant_files, 3);
    }

    #[test]
    fn test_grouping_keeps_identical_paths() {
        let mut grouping = Grouping::new();
        grouping.add(PathBuf::from("/same"), Ok(size_key(5)));
        grouping.add(PathBuf::from("/same"), Ok(size_key(5)));
        assert_eq!(grouping.get(&size_key(5)).unwrap().len(), 2);
    }

    #[test]
    fn test_select_duplicates_filters_singletons() {
        let mut grouping = Grouping::new();
        grouping.add(PathBuf::from("/a"), Ok(size_key(100)));
        grouping.add(PathBuf::from("/b"), Ok(size_key(100)));
        grouping.add(PathBuf::from("/c"), Ok(size_key(200)));

        let table = select_duplicates(&grouping);
        assert_eq!(table.len(), 1);
        assert!(table.get(&size_key(200)).is_none());
        assert_eq!(table.get(&size_key(100)).unwrap().len(), 2);
        assert_eq!(table.file_count(), 2);
        assert_eq!(table.redundant_count(), 1);

        // Selection leaves the grouping untouched.
        assert_eq!(grouping.len(), 2);
    }

    #[test]
    fn test_select_duplicates_empty() {
        let table = select_duplicates(&Grouping::new());
        assert!(table.is_empty());
        assert_eq!(table.redundant_count(), 0);
    }

    #[test]
    fn test_table_iter_order_matches_first_seen() {
        let mut grouping = Grouping::new();
        for (path, size) in [("/a", 3), ("/b", 1), ("/c", 3), ("/d", 1), ("/e", 2), ("/f", 2)] {
            grouping.add(PathBuf::from(path), Ok(size_key(size)));
        }

        let table = select_duplicates(&grouping);
        let keys: Vec<String> = table.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_group_paths_by_hash() {
        let dir = TempDir::new().unwrap();
        let names = ["a.txt", "b.txt", "c.txt"];
        for (name, content) in names.iter().zip([b"X", b"X", b"Y"]) {
            fs::write(dir.path().join(name), content).unwrap();
        }
        let paths: Vec<PathBuf> = names.iter().map(|n| dir.path().join(n)).collect();

        let grouping = group_paths(paths.clone(), &KeyExtractor::new(Strategy::Hash));
        let table = select_duplicates(&grouping);

        assert_eq!(table.len(), 1);
        let group = &table.groups()[0];
        assert_eq!(group.paths, vec![paths[0].clone(), paths[1].clone()]);
        assert_eq!(group.survivor(), Some(paths[0].as_path()));
    }

    #[test]
    fn test_group_paths_records_errors() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, b"same").unwrap();
        fs::write(&b, b"same").unwrap();
        let ghost = dir.path().join("ghost.txt");

        let grouping = group_paths(
            vec![a.clone(), ghost.clone(), b.clone()],
            &KeyExtractor::new(Strategy::Hash),
        );

        assert_eq!(grouping.errors().len(), 1);
        assert_eq!(grouping.errors()[0].path(), ghost.as_path());
        assert_eq!(select_duplicates(&grouping).groups()[0].paths, vec![a, b]);
    }

    #[test]
    fn test_large_path_count_performance() {
        use std::time::Instant;

        let start = Instant::now();
        let mut grouping = Grouping::new();
        for i in 0..100_000u64 {
            let size = if i % 2 == 0 { i } else { i / 100 };
            grouping.add(PathBuf::from(format!("/file{i}.txt")), Ok(size_key(size)));
        }
        let table = select_duplicates(&grouping);
        let elapsed = start.elapsed();

        assert_eq!(grouping.stats().total_files, 100_000);
        assert!(!table.is_empty());
        assert!(
            elapsed.as_secs() < 2,
            "Grouping took too long: {:?}",
            elapsed
        );
    }
}
