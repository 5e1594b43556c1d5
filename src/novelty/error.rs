use thiserror::Error;

use crate::corpus::CorpusError;

#[derive(Debug, Error)]
pub enum NoveltyError {
    #[error("corpus unavailable: {0}")]
    CorpusUnreadable(#[from] CorpusError),

    /// Query and corpus fingerprints came back with different dimensions.
    #[error(
        "fingerprint dimension mismatch for {document}: query has {query_dim}, document has {document_dim}"
    )]
    DimensionMismatch {
        document: String,
        query_dim: usize,
        document_dim: usize,
    },
}
