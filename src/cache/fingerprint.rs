use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use moka::sync::Cache;

use crate::embedding::Fingerprint;
use crate::hashing::{KeyScope, fingerprint_key, hash_content};

/// Hit/miss counters since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// In-memory fingerprint cache keyed by content hash.
pub struct FingerprintCache {
    pub(super) entries: Cache<[u8; 32], Fingerprint>,
    hits: AtomicU64,
    misses: AtomicU64,
    dirty: AtomicBool,
}

impl FingerprintCache {
    const DEFAULT_CAPACITY: u64 = crate::constants::DEFAULT_CACHE_CAPACITY;

    /// Creates a cache with the default capacity.
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a cache with a max entry capacity.
    #[inline]
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            entries: Cache::builder().max_capacity(capacity).build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            dirty: AtomicBool::new(false),
        }
    }

    /// Cache key for `bytes` fingerprinted under `scope`.
    #[inline]
    pub fn key_for(bytes: &[u8], scope: &KeyScope<'_>) -> [u8; 32] {
        fingerprint_key(&hash_content(bytes), scope)
    }

    /// Looks up a fingerprint by key, counting the hit or miss.
    pub fn lookup(&self, key: &[u8; 32]) -> Option<Fingerprint> {
        let found = self.entries.get(key);
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    /// Inserts a fingerprint and marks the cache as changed since the last save.
    #[inline]
    pub fn insert(&self, key: [u8; 32], fingerprint: Fingerprint) {
        self.entries.insert(key, fingerprint);
        self.dirty.store(true, Ordering::Release);
    }

    /// Whether entries were inserted since the last snapshot save (or load).
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Clears the changed flag, returning its previous value.
    #[inline]
    pub(crate) fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    #[inline]
    pub(crate) fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    #[inline]
    pub fn contains(&self, key: &[u8; 32]) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of cached fingerprints (after pending maintenance).
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for FingerprintCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FingerprintCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FingerprintCache")
            .field("entries", &self.entries.entry_count())
            .field("stats", &self.stats())
            .field("dirty", &self.is_dirty())
            .finish()
    }
}
