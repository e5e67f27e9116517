//! MD5 file hasher with streaming support.
//!
//! # Overview
//! This module provides the [`Hasher`] struct for computing MD5 digests of
//! file contents. Files are read in fixed-size chunks, so memory use stays
//! bounded regardless of file size.
//!
//! # Example
//!
//! ```no_run
//! use flatdupe::scanner::{hash_to_hex, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let hash = hasher.full_hash(Path::new("photo.jpg")).unwrap();
//! println!("{}", hash_to_hex(&hash));
//! ```

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use md5::{Digest, Md5};

use super::KeyError;

/// Default read chunk size (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// 128-bit MD5 digest.
pub type Hash = [u8; 16];

/// Streaming MD5 hasher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hasher {
    chunk_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default 64 KiB chunk size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Create a hasher with a custom chunk size (clamped to at least 1 byte).
    #[must_use]
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Chunk size used for reads.
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Compute the digest of a file's full content.
    ///
    /// Empty files yield the digest of empty input.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::UnreadableFile`] if the file cannot be opened, is not
    /// a regular file, or a read fails mid-stream.
    pub fn full_hash(&self, path: &Path) -> Result<Hash, KeyError> {
        let unreadable = |source: io::Error| KeyError::UnreadableFile {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(unreadable)?;
        let metadata = file.metadata().map_err(unreadable)?;
        if !metadata.is_file() {
            return Err(KeyError::not_a_file(path, false));
        }

        let hash = self.hash_reader(file).map_err(unreadable)?;
        log::trace!("Hashed {} ({} bytes)", path.display(), metadata.len());
        Ok(hash)
    }

    /// Compute the digest of everything readable from `reader`.
    ///
    /// # Errors
    ///
    /// Propagates any read error other than [`io::ErrorKind::Interrupted`].
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> io::Result<Hash> {
        let mut hasher = Md5::new();
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            let bytes_read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(hasher.finalize().into())
    }

    /// Compute the digest of an in-memory byte slice.
    #[must_use]
    pub fn hash_bytes(data: &[u8]) -> Hash {
        Md5::digest(data).into()
    }
}

/// Render a digest as lowercase hexadecimal (32 characters).
#[must_use]
pub fn hash_to_hex(hash: &Hash) -> String {
    hash.iter().map(|b| format!("{b:02x}")).collect()
}

/// Parse a 32-character hexadecimal string into a digest.
///
/// Returns `None` if the string has the wrong length or contains non-hex characters.
#[must_use]
pub fn hex_to_hash(hex: &str) -> Option<Hash> {
    if hex.len() != 32 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let mut hash = [0u8; 16];
    for (i, byte) in hash.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
    }
    Some(hash)
}
