use thiserror::Error;

/// A document could not be turned into usable text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("document is not a PDF (missing %PDF- header)")]
    NotPdf,

    #[error("failed to parse PDF: {reason}")]
    Parse { reason: String },

    #[error("extracted text is empty")]
    EmptyText,

    #[error("extractor reported an error in-band: {excerpt}")]
    ErrorMarker { excerpt: String },

    #[error("extraction task failed: {reason}")]
    TaskFailed { reason: String },
}
