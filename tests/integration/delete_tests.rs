use flatdupe::actions::{
    delete_duplicates, execute_if_confirmed, Decision, DeleteConfig, DeleteError, NoopCallback,
};
use flatdupe::duplicates::DuplicateFinder;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::tempdir;

fn write(dir: &std::path::Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_confirmed_deletion_keeps_first_of_group() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a.txt", b"X");
    let b = write(dir.path(), "b.txt", b"X");
    let c = write(dir.path(), "c.txt", b"Y");

    let (table, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    let result = execute_if_confirmed::<NoopCallback>(
        &table,
        Decision::Confirmed,
        &DeleteConfig::default(),
        None,
    )
    .unwrap();

    assert!(a.exists());
    assert!(!b.exists());
    assert!(c.exists());
    assert_eq!(result.success_count(), 1);
    assert_eq!(result.successes[0].path, b);
    assert_eq!(result.failure_count(), 0);
    assert_eq!(result.kept, vec![a]);
    assert_eq!(result.bytes_freed, 1);
}

#[test]
fn test_declined_deletion_touches_nothing() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a.txt", b"X");
    let b = write(dir.path(), "b.txt", b"X");

    let (table, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    let result = execute_if_confirmed::<NoopCallback>(
        &table,
        Decision::Declined,
        &DeleteConfig::default(),
        None,
    );

    assert!(result.is_none());
    assert!(a.exists());
    assert!(b.exists());
}

#[test]
fn test_each_group_ends_with_one_survivor() {
    let dir = tempdir().unwrap();
    for (name, content) in [
        ("1.txt", "red"),
        ("2.txt", "blue"),
        ("3.txt", "red"),
        ("4.txt", "blue"),
        ("5.txt", "red"),
        ("6.txt", "green"),
    ] {
        write(dir.path(), name, content.as_bytes());
    }

    let (table, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    let survivors: Vec<PathBuf> = table
        .groups()
        .iter()
        .filter_map(|g| g.survivor().map(PathBuf::from))
        .collect();

    let result =
        delete_duplicates::<NoopCallback>(&table, &DeleteConfig::default(), None);
    assert_eq!(result.success_count(), 3);

    let (after, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    assert!(after.is_empty());
    assert_eq!(summary.total_files, 3);
    for survivor in survivors {
        assert!(survivor.exists(), "{} should survive", survivor.display());
    }
}

#[test]
fn test_failure_does_not_stop_other_groups() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a1", b"aaa");
    let a2 = write(dir.path(), "a2", b"aaa");
    write(dir.path(), "b1", b"bbbb");
    let b2 = write(dir.path(), "b2", b"bbbb");

    let (table, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    // Removed behind the table's back.
    fs::remove_file(&a2).unwrap();

    let result = delete_duplicates::<NoopCallback>(&table, &DeleteConfig::default(), None);

    assert_eq!(result.failure_count(), 1);
    assert!(matches!(&result.failures[0], DeleteError::NotFound(p) if *p == a2));
    assert_eq!(result.success_count(), 1);
    assert!(!b2.exists());
}

#[test]
fn test_shutdown_before_deletion_removes_nothing() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a", b"same");
    let b = write(dir.path(), "b", b"same");

    let (table, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    let config = DeleteConfig::default().with_shutdown_flag(Arc::new(AtomicBool::new(true)));
    let result = delete_duplicates::<NoopCallback>(&table, &config, None);

    assert!(result.interrupted);
    assert_eq!(result.success_count(), 0);
    assert!(a.exists());
    assert!(b.exists());
}
