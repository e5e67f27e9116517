use clap::Parser;
use flatdupe::cli::Cli;
use flatdupe::error::ExitCode;
use flatdupe::run_app_with_writer;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

/// Run the app against `dir` with an empty config file, capturing stdout.
fn run(dir: &Path, extra: &[&str]) -> (ExitCode, String) {
    let config_dir = TempDir::new().unwrap();
    let config = config_dir.path().join("config.toml");
    fs::write(&config, "").unwrap();

    let mut argv = vec![
        "flatdupe".to_string(),
        "-q".to_string(),
        "--no-color".to_string(),
        "--config".to_string(),
        config.display().to_string(),
        "scan".to_string(),
        dir.display().to_string(),
    ];
    argv.extend(extra.iter().map(|s| s.to_string()));

    let cli = Cli::try_parse_from(argv).unwrap();
    let mut out = Vec::new();
    let code = run_app_with_writer(cli, &mut out).unwrap();
    (code, String::from_utf8(out).unwrap())
}

fn json(text: &str) -> serde_json::Value {
    serde_json::from_str(text).unwrap()
}

#[test]
fn test_json_report_for_duplicates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "X").unwrap();
    fs::write(dir.path().join("b.txt"), "X").unwrap();
    fs::write(dir.path().join("c.txt"), "Y").unwrap();

    let (code, out) = run(dir.path(), &["--output", "json"]);
    let value = json(&out);

    assert_eq!(code, ExitCode::Success);
    assert_eq!(value["strategy"], "hash");
    assert_eq!(value["duplicates"].as_array().unwrap().len(), 1);
    assert_eq!(
        value["duplicates"][0]["key"],
        "02129bb861061d1a052c592e2dc6b383"
    );
    assert!(value["duplicates"][0]["survivor"]
        .as_str()
        .unwrap()
        .ends_with("a.txt"));
    assert_eq!(value["summary"]["exit_code_name"], "FD000");
    assert!(value["deletion"].is_null());
}

#[test]
fn test_no_duplicates_exit_code() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "one").unwrap();
    fs::write(dir.path().join("b.txt"), "two").unwrap();

    let (code, out) = run(dir.path(), &["--output", "json"]);
    assert_eq!(code, ExitCode::NoDuplicates);
    assert_eq!(json(&out)["summary"]["exit_code"], 2);
}

#[test]
fn test_size_strategy_flag() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.bin"), vec![0u8; 100]).unwrap();
    fs::write(dir.path().join("b.bin"), vec![1u8; 100]).unwrap();
    fs::write(dir.path().join("c.bin"), vec![2u8; 200]).unwrap();

    let (code, out) = run(dir.path(), &["--by", "size", "--output", "json"]);
    let value = json(&out);

    assert_eq!(code, ExitCode::Success);
    assert_eq!(value["strategy"], "size");
    assert_eq!(value["duplicates"][0]["key"], "100");
}

#[test]
fn test_delete_with_yes_reports_deletion() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    fs::write(&a, "X").unwrap();
    fs::write(&b, "X").unwrap();

    let (code, out) = run(dir.path(), &["--output", "json", "--delete", "--yes"]);
    let value = json(&out);

    assert_eq!(code, ExitCode::Success);
    assert!(a.exists());
    assert!(!b.exists());
    assert_eq!(value["deletion"]["deleted"].as_array().unwrap().len(), 1);
    assert!(value["deletion"]["failed"].as_array().unwrap().is_empty());
}

#[test]
fn test_table_output_lists_groups() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "X").unwrap();
    fs::write(dir.path().join("b.txt"), "X").unwrap();

    let (code, out) = run(dir.path(), &[]);

    assert_eq!(code, ExitCode::Success);
    assert!(out.contains("MD5 hash"));
    assert!(out.contains("a.txt (keep)"));
    assert!(!out.contains('\u{1b}'));
}

#[test]
fn test_table_output_without_duplicates_prints_message() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "one").unwrap();
    fs::write(dir.path().join("b.txt"), "two").unwrap();

    let (code, out) = run(dir.path(), &[]);

    assert_eq!(code, ExitCode::NoDuplicates);
    assert_eq!(out, "No duplicates found!\n");
    assert!(!out.contains('╭'));
}

#[test]
fn test_csv_output() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "X").unwrap();
    fs::write(dir.path().join("b.txt"), "X").unwrap();

    let (_, out) = run(dir.path(), &["--output", "csv"]);
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines[0], "group_id,key,path,role");
    assert!(lines[1].ends_with(",keep"));
    assert!(lines[2].ends_with(",delete"));
}

#[test]
fn test_missing_directory_is_an_error() {
    let dir = tempdir().unwrap();
    let cli = Cli::try_parse_from([
        "flatdupe",
        "-q",
        "scan",
        dir.path().join("absent").to_str().unwrap(),
    ])
    .unwrap();

    let err = run_app_with_writer(cli, &mut Vec::new()).unwrap_err();
    assert!(format!("{err:#}").contains("Path not found"));
}

#[test]
fn test_hash_subcommand() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("abc.txt");
    fs::write(&file, "abc").unwrap();
    let missing = dir.path().join("missing.txt");

    let cli = Cli::try_parse_from([
        "flatdupe",
        "-q",
        "hash",
        file.to_str().unwrap(),
        missing.to_str().unwrap(),
    ])
    .unwrap();
    let mut out = Vec::new();
    let code = run_app_with_writer(cli, &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();

    assert_eq!(code, ExitCode::PartialSuccess);
    assert_eq!(
        out,
        format!("900150983cd24fb0d6963f7d28e17f72  {}\n", file.display())
    );
}
