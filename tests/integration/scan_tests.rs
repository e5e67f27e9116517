use flatdupe::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use flatdupe::scanner::{ComparisonKey, Hasher, KeyError, Strategy};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tempfile::tempdir;

fn write(dir: &std::path::Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    File::create(&path).unwrap().write_all(content).unwrap();
    path
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let (table, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(table.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
    assert!(!summary.has_errors());
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"content a");
    write(dir.path(), "b.txt", b"content b");
    write(dir.path(), "c.txt", b"content c");

    let finder = DuplicateFinder::with_defaults();
    let (table, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(table.is_empty());
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.distinct_keys, 3);
}

#[test]
fn test_scan_hash_strategy_groups_identical_content() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a.txt", b"X");
    let b = write(dir.path(), "b.txt", b"X");
    let c = write(dir.path(), "c.txt", b"Y");

    let finder = DuplicateFinder::with_defaults();
    let (table, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(table.len(), 1);
    let group = &table.groups()[0];
    assert_eq!(group.key, ComparisonKey::Digest(Hasher::hash_bytes(b"X")));
    assert_eq!(group.paths, vec![a, b]);
    assert!(table.iter().all(|(_, g)| !g.paths.contains(&c)));
    assert_eq!(summary.redundant_files, 1);
}

#[test]
fn test_scan_size_strategy_groups_equal_lengths() {
    let dir = tempdir().unwrap();
    let small1 = write(dir.path(), "s1.bin", &[1u8; 100]);
    let small2 = write(dir.path(), "s2.bin", &[2u8; 100]);
    write(dir.path(), "big.bin", &[3u8; 200]);

    let finder = DuplicateFinder::new(FinderConfig::default().with_strategy(Strategy::Size));
    let (table, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(table.len(), 1);
    let group = table.get(&ComparisonKey::Size(100)).unwrap();
    assert_eq!(group.paths, vec![small1, small2]);
    assert_eq!(summary.strategy, Strategy::Size);
}

#[test]
fn test_size_strategy_is_an_approximation() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.bin", b"abc");
    write(dir.path(), "b.bin", b"xyz");

    let by_size = DuplicateFinder::new(FinderConfig::default().with_strategy(Strategy::Size));
    let (size_table, _) = by_size.find_duplicates(dir.path()).unwrap();
    let (hash_table, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(size_table.len(), 1);
    assert!(hash_table.is_empty());
}

#[test]
fn test_scan_ignores_subdirectories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("subdir");
    fs::create_dir(&sub).unwrap();
    write(dir.path(), "a.txt", b"same");
    write(&sub, "b.txt", b"same");

    let (table, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(table.is_empty());
    assert_eq!(summary.total_files, 1);
}

#[test]
fn test_unreadable_file_is_reported_not_fatal() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a.txt", b"dup");
    let b = write(dir.path(), "b.txt", b"dup");
    let missing = dir.path().join("vanished.txt");

    let finder = DuplicateFinder::with_defaults();
    let (table, summary) = finder
        .find_duplicates_in_paths(vec![a.clone(), missing.clone(), b.clone()])
        .unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(table.groups()[0].paths, vec![a, b]);
    assert_eq!(summary.scan_errors.len(), 1);
    assert_eq!(summary.scan_errors[0].path(), missing.as_path());
    assert!(matches!(
        summary.scan_errors[0],
        KeyError::UnreadableFile { .. }
    ));
    assert_eq!(summary.total_files, 3);
}

#[cfg(unix)]
#[test]
fn test_permission_denied_file_is_reported() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"dup");
    write(dir.path(), "b.txt", b"dup");
    let locked = write(dir.path(), "locked.txt", b"secret");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can still read the file.
    if File::open(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
        return;
    }

    let (table, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(summary.scan_errors.len(), 1);
    assert_eq!(summary.scan_errors[0].path(), locked.as_path());
    assert_eq!(
        summary.scan_errors[0].io_kind(),
        std::io::ErrorKind::PermissionDenied
    );
}

#[test]
fn test_scan_is_idempotent() {
    let dir = tempdir().unwrap();
    for (name, content) in [("a", "1"), ("b", "2"), ("c", "1"), ("d", "2"), ("e", "3")] {
        write(dir.path(), name, content.as_bytes());
    }

    let finder = DuplicateFinder::with_defaults();
    let (first, _) = finder.find_duplicates(dir.path()).unwrap();
    let (second, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn test_scan_missing_root() {
    let dir = tempdir().unwrap();
    let result = DuplicateFinder::with_defaults().find_duplicates(&dir.path().join("nope"));
    assert!(matches!(result, Err(FinderError::NotFound(_))));
}

#[test]
fn test_scan_root_is_a_file() {
    let dir = tempdir().unwrap();
    let file = write(dir.path(), "file.txt", b"x");
    let result = DuplicateFinder::with_defaults().find_duplicates(&file);
    assert!(matches!(result, Err(FinderError::NotADirectory(_))));
}
