//! Content-addressed fingerprint cache.
//!
//! Keys are BLAKE3 digests of the document bytes and a [`KeyScope`](crate::hashing::KeyScope)
//! (model, task, extractor, character budget). The bytes are
//! the ones read during the current scan, so an entry can only be returned for
//! content identical to what it was computed from; a changed file hashes to a new
//! key and is re-fingerprinted. The cache is an optimization: a miss always falls
//! back to extraction + embedding.

mod error;
mod fingerprint;
mod snapshot;


pub use error::CacheError;
pub use fingerprint::{CacheStats, FingerprintCache};
pub use snapshot::SNAPSHOT_VERSION;
