use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use flatdupe::cli::OutputFormat;
use flatdupe::config::{Config, ENV_PREFIX};
use flatdupe::scanner::{Strategy, DEFAULT_CHUNK_SIZE};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_defaults() {
    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .extract()
        .unwrap();
    assert_eq!(config.strategy, Strategy::Hash);
    assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
    assert_eq!(config.output, OutputFormat::Table);
}

#[test]
fn test_config_partial_toml_keeps_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "output = \"json\"\n").unwrap();

    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .extract()
        .unwrap();

    assert_eq!(config.output, OutputFormat::Json);
    assert_eq!(config.strategy, Strategy::Hash);
    assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
}

#[test]
fn test_env_overrides_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "chunk_size = 1024\n").unwrap();

    // Only chunk_size is set: it changes read granularity, not results, so
    // other tests in this binary are unaffected.
    std::env::set_var("FLATDUPE_CHUNK_SIZE", "4096");
    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()
        .unwrap();
    std::env::remove_var("FLATDUPE_CHUNK_SIZE");

    assert_eq!(config.chunk_size, 4096);
}

#[test]
fn test_config_load_invalid_toml() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "strategy = [unclosed").unwrap();

    assert!(Config::load(Some(&path)).is_err());
}

#[test]
fn test_config_load_full_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "strategy = \"size\"\nchunk_size = 8192\noutput = \"csv\"\n",
    )
    .unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.strategy, Strategy::Size);
    assert_eq!(config.output, OutputFormat::Csv);
}
