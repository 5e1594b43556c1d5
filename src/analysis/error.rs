use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::embedding::EmbeddingError;
use crate::extract::ExtractionError;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build embedding client: {0}")]
    EmbedderInit(#[from] EmbeddingError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The uploaded proposal itself could not be turned into text.
    #[error("could not extract text from {source_name}: {source}")]
    Extraction {
        source_name: String,
        #[source]
        source: ExtractionError,
    },
}
