use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ComparisonError {
    /// One of the vectors has zero length or zero magnitude.
    #[error("cannot compare a zero-magnitude fingerprint")]
    ZeroMagnitude,

    #[error("fingerprint contains non-finite values")]
    NonFinite,

    /// Both fingerprints must come from the same model.
    #[error("fingerprint dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },
}
