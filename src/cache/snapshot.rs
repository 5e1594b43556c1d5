//! JSON persistence for [`FingerprintCache`].

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::CacheError;
use super::fingerprint::FingerprintCache;
use crate::config::Config;
use crate::embedding::Fingerprint;
use crate::hashing::{from_hex, to_hex};

/// Version 2 keys include the extractor and character budget.
pub const SNAPSHOT_VERSION: u32 = 2;

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    entries: Vec<SnapshotEntry>,
}

#[derive(Serialize, Deserialize)]
struct SnapshotEntry {
    key: String,
    vector: Fingerprint,
}

impl FingerprintCache {
    /// Cache sized from `config`, pre-filled from `SIEVE_CACHE_PATH` when set.
    ///
    /// An unreadable or corrupt snapshot is logged and skipped; the cache then
    /// starts empty.
    pub fn from_config(config: &Config) -> Self {
        let cache = Self::with_capacity(config.cache_capacity);
        if let Some(path) = &config.cache_path
            && let Err(e) = cache.load_snapshot(path)
        {
            warn!(path = %path.display(), error = %e, "Ignoring fingerprint cache snapshot");
        }
        cache
    }

    /// Writes all entries to `path` through a uniquely named temp file in the same
    /// directory, so concurrent savers never share a partial file.
    pub fn save_snapshot(&self, path: &Path) -> Result<usize, CacheError> {
        let entries: Vec<SnapshotEntry> = self
            .entries
            .iter()
            .map(|(key, vector)| SnapshotEntry {
                key: to_hex(&key),
                vector,
            })
            .collect();
        let count = entries.len();

        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            entries,
        };
        let json = serde_json::to_vec(&snapshot).map_err(|e| CacheError::Format {
            reason: e.to_string(),
        })?;

        let io_err = |source: std::io::Error| CacheError::Io {
            path: path.to_path_buf(),
            source,
        };
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(&json).map_err(io_err)?;
        tmp.persist(path).map_err(|e| io_err(e.error))?;

        debug!(path = %path.display(), entries = count, "Saved fingerprint snapshot");
        Ok(count)
    }

    /// Loads entries from `path`. A missing file loads nothing.
    pub fn load_snapshot(&self, path: &Path) -> Result<usize, CacheError> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(source) => {
                return Err(CacheError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let snapshot: Snapshot =
            serde_json::from_slice(&bytes).map_err(|e| CacheError::Format {
                reason: e.to_string(),
            })?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(CacheError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        let mut loaded = 0;
        for entry in snapshot.entries {
            let key = from_hex(&entry.key).ok_or_else(|| CacheError::Format {
                reason: format!("bad key: {}", entry.key),
            })?;
            if entry.vector.is_degenerate() {
                continue;
            }
            self.entries.insert(key, entry.vector);
            loaded += 1;
        }

        debug!(path = %path.display(), entries = loaded, "Loaded fingerprint snapshot");
        Ok(loaded)
    }
}
