use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache snapshot I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid cache snapshot: {reason}")]
    Format { reason: String },

    #[error("unsupported cache snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}
