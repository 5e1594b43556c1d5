//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
///
/// All of these are fatal at the boundary: they surface before any corpus document
/// is read.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable was not set (the provider API key).
    #[error("missing required environment variable: {name}")]
    MissingEnvVar { name: &'static str },

    /// An environment variable was set but could not be parsed.
    #[error("invalid value '{value}' for {name}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// A field holds a value outside its allowed range.
    #[error("invalid setting `{field}`: {reason}")]
    InvalidSetting { field: &'static str, reason: String },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
