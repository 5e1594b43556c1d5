//! Cross-cutting, shared constants.
//!
//! Defaults here are the values [`crate::config::Config`] falls back to when the matching
//! `SIEVE_*` variable is unset.
//!
//! # Dimension Invariants
//!
//! Every fingerprint in one check must come from the same embedding model, so the
//! dimension is validated once at the provider boundary (see
//! [`validate_embedding_dim`]) and treated as fixed afterwards.

/// Embedding model used for both the query proposal and corpus documents.
pub const DEFAULT_EMBEDDING_MODEL: &str = "models/text-embedding-004";

/// Output dimension of [`DEFAULT_EMBEDDING_MODEL`].
pub const DEFAULT_EMBEDDING_DIM: usize = 768;

/// Generative model used for rubric scoring.
pub const DEFAULT_SCORING_MODEL: &str = "gemini-pro-latest";

/// Base URL of the Generative Language API.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Number of matches kept in top-k mode.
pub const DEFAULT_TOP_K: usize = 3;

/// Matches at or above this similarity are flagged in reports.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.70;

/// Concurrent extraction + embedding tasks per corpus scan.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

pub const DEFAULT_EMBED_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_SCORING_TIMEOUT_SECS: u64 = 120;

/// Characters of document text sent to the embedding provider.
pub const DEFAULT_MAX_EMBED_CHARS: usize = 30_000;

pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Only files with this extension are read from the corpus directory.
pub const DEFAULT_CORPUS_EXTENSION: &str = "pdf";

pub const DEFAULT_CORPUS_DIR: &str = "./database";

/// Marker an in-band extractor writes instead of document text on failure.
pub const EXTRACTION_ERROR_MARKER: &str = "Error reading PDF file";

/// Error returned by [`validate_embedding_dim`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DimValidationError {
    #[error("embedding dimension cannot be zero")]
    ZeroDimension,

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    Mismatch { expected: usize, actual: usize },
}

/// Checks a provider-returned vector length against the configured dimension.
pub fn validate_embedding_dim(expected: usize, actual: usize) -> Result<(), DimValidationError> {
    if expected == 0 {
        return Err(DimValidationError::ZeroDimension);
    }
    if expected != actual {
        return Err(DimValidationError::Mismatch { expected, actual });
    }
    Ok(())
}
