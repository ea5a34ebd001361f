//! Cache key derivation
//!
//! Hashes the contents of tracked files into a stable key for a cache volume.

use crate::error::{DaggersError, DaggersResult};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Identifier of a persistent cache volume: `prefix + hex(sha256(contents))`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// The key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

/// Derive a cache key from the contents of `file_names` inside `scope_dir`
///
/// Files are hashed in the order given, so callers must keep that order
/// stable. Any missing or unreadable file fails the whole derivation with
/// [`DaggersError::CacheKeyRead`]. An empty list hashes zero bytes.
pub fn derive_cache_key<S: AsRef<str>>(
    prefix: &str,
    scope_dir: &Path,
    file_names: &[S],
) -> DaggersResult<CacheKey> {
    let mut hasher = Sha256::new();

    for name in file_names {
        let path = scope_dir.join(name.as_ref());
        let contents = fs::read(&path).map_err(|e| DaggersError::CacheKeyRead {
            path: path.clone(),
            source: e,
        })?;
        debug!("Hashing {} ({} bytes)", path.display(), contents.len());
        hasher.update(&contents);
    }

    let key = format!("{}{}", prefix, hex::encode(hasher.finalize()));
    Ok(CacheKey(key))
}
