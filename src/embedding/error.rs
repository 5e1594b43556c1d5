use thiserror::Error;

/// Why a fingerprint could not be produced.
///
/// For a corpus document every variant means "exclude this document". For the query
/// document every variant means the novelty check is unavailable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmbeddingError {
    #[error("refusing to embed empty text")]
    EmptyInput,

    #[error("embedding request failed: {reason}")]
    Transport { reason: String },

    #[error("embedding provider rejected the credential (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("embedding provider rate limit exceeded")]
    RateLimited,

    #[error("embedding provider returned HTTP {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("malformed embedding response: {reason}")]
    Malformed { reason: String },

    #[error("embedding call timed out after {secs}s")]
    Timeout { secs: u64 },
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(err: reqwest::Error) -> Self {
        EmbeddingError::Transport {
            reason: err.to_string(),
        }
    }
}
