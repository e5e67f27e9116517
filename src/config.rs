//! Application configuration management.
//!
//! Settings are merged from several layers, later layers winning:
//!
//! 1. Built-in defaults
//! 2. A TOML file (`--config PATH`, or `config.toml` in the platform config directory)
//! 3. `FLATDUPE_*` environment variables (e.g. `FLATDUPE_STRATEGY=size`)
//! 4. Command-line flags
//!
//! ```toml
//! strategy = "size"
//! chunk_size = 1048576
//! output = "json"
//! ```

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::{OutputFormat, ScanArgs};
use crate::scanner::{Strategy, DEFAULT_CHUNK_SIZE};

/// Prefix of environment variables read by [`Config::load`].
pub const ENV_PREFIX: &str = "FLATDUPE_";

/// Largest accepted hashing chunk size (256 MiB).
pub const MAX_CHUNK_SIZE: usize = 256 * 1024 * 1024;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Comparison strategy.
    pub strategy: Strategy,
    /// Read size used while hashing, in bytes.
    pub chunk_size: usize,
    /// Output format of the scan subcommand.
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: Strategy::Hash,
            chunk_size: DEFAULT_CHUNK_SIZE,
            output: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Load the configuration from defaults, file and environment.
    ///
    /// An explicit `path` must exist. Without one, the default file is used
    /// when present and silently skipped otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the explicit file is missing, a layer cannot be
    /// parsed, or the merged values are out of range.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        match explicit {
            Some(path) => {
                if !path.is_file() {
                    bail!("Configuration file not found: {}", path.display());
                }
                log::debug!("Loading configuration from {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
            None => {
                if let Some(path) = Self::default_path() {
                    log::trace!("Default configuration path: {}", path.display());
                    figment = figment.merge(Toml::file(path));
                }
            }
        }

        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Default platform-specific configuration file path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "flatdupe", "flatdupe")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply the scan subcommand's flags on top of the loaded layers.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting chunk size is out of range.
    pub fn apply_scan_args(&mut self, args: &ScanArgs) -> Result<()> {
        if let Some(by) = args.by {
            self.strategy = by.into();
        }
        if let Some(chunk_size) = args.chunk_size {
            self.chunk_size = usize::try_from(chunk_size).unwrap_or(usize::MAX);
        }
        if let Some(output) = args.output {
            self.output = output;
        }
        self.validate()
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns an error if `chunk_size` is zero or above [`MAX_CHUNK_SIZE`].
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 || self.chunk_size > MAX_CHUNK_SIZE {
            bail!(
                "chunk_size must be between 1 and {} bytes, got {}",
                MAX_CHUNK_SIZE,
                self.chunk_size
            );
        }
        Ok(())
    }
}
