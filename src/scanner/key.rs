//! Comparison strategies and key extraction.
//!
//! A [`KeyExtractor`] reduces a file path to a [`ComparisonKey`]. Files with
//! equal keys are treated as duplicates for the active [`Strategy`]:
//!
//! - [`Strategy::Hash`]: MD5 of the full content. Practically exact.
//! - [`Strategy::Size`]: byte length from metadata. Never reads content, so
//!   files of equal length but different bytes are reported as duplicates.
//!   This is a documented approximation, not the default.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::hasher::{hash_to_hex, Hash, Hasher};
use super::KeyError;

/// How files are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Compare by MD5 content digest.
    #[default]
    Hash,
    /// Compare by byte length only.
    Size,
}

impl Strategy {
    /// Column title used when rendering keys of this strategy.
    #[must_use]
    pub fn key_label(self) -> &'static str {
        match self {
            Self::Hash => "MD5 hash",
            Self::Size => "Size [bytes]",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hash => write!(f, "hash"),
            Self::Size => write!(f, "size"),
        }
    }
}

/// Value used to bucket files into candidate duplicate groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonKey {
    /// MD5 content digest.
    Digest(Hash),
    /// File length in bytes.
    Size(u64),
}

impl ComparisonKey {
    /// Strategy that produces this kind of key.
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        match self {
            Self::Digest(_) => Strategy::Hash,
            Self::Size(_) => Strategy::Size,
        }
    }
}

impl fmt::Display for ComparisonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digest(hash) => f.write_str(&hash_to_hex(hash)),
            Self::Size(size) => write!(f, "{size}"),
        }
    }
}

impl Serialize for ComparisonKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Strategy-specific key extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyExtractor {
    /// Digest the full file content.
    Hash(Hasher),
    /// Stat the file for its length.
    Size,
}

impl KeyExtractor {
    /// Create an extractor for `strategy` with default settings.
    #[must_use]
    pub fn new(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Hash => Self::Hash(Hasher::new()),
            Strategy::Size => Self::Size,
        }
    }

    /// Create an extractor whose hasher reads `chunk_size` bytes at a time.
    ///
    /// The chunk size is ignored by the size strategy.
    #[must_use]
    pub fn with_chunk_size(strategy: Strategy, chunk_size: usize) -> Self {
        match strategy {
            Strategy::Hash => Self::Hash(Hasher::with_chunk_size(chunk_size)),
            Strategy::Size => Self::Size,
        }
    }

    /// Strategy implemented by this extractor.
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        match self {
            Self::Hash(_) => Strategy::Hash,
            Self::Size => Strategy::Size,
        }
    }

    /// Reduce `path` to its comparison key.
    ///
    /// # Errors
    ///
    /// - [`KeyError::UnreadableFile`] when hashing fails
    /// - [`KeyError::MetadataUnavailable`] when the size lookup fails
    pub fn extract(&self, path: &Path) -> Result<ComparisonKey, KeyError> {
        match self {
            Self::Hash(hasher) => hasher.full_hash(path).map(ComparisonKey::Digest),
            Self::Size => file_size(path).map(ComparisonKey::Size),
        }
    }
}

/// Byte length of a regular file, from metadata only.
///
/// # Errors
///
/// Returns [`KeyError::MetadataUnavailable`] if the stat call fails or the
/// path is not a regular file.
pub fn file_size(path: &Path) -> Result<u64, KeyError> {
    let metadata = fs::metadata(path).map_err(|source| KeyError::MetadataUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    if !metadata.is_file() {
        return Err(KeyError::not_a_file(path, true));
    }
    Ok(metadata.len())
}
