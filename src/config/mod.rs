//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `SIEVE_*` environment variables. The
//! provider credential is the one required value; it is read once here and handed to
//! every component that talks to the provider.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_CACHE_CAPACITY, DEFAULT_CORPUS_DIR, DEFAULT_CORPUS_EXTENSION,
    DEFAULT_EMBED_TIMEOUT_SECS, DEFAULT_EMBEDDING_DIM, DEFAULT_EMBEDDING_MODEL,
    DEFAULT_MAX_CONCURRENCY, DEFAULT_MAX_EMBED_CHARS, DEFAULT_SCORING_MODEL,
    DEFAULT_SCORING_TIMEOUT_SECS, DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_TOP_K,
};

/// Provider credential. `Debug` never prints the key.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the raw key for request headers.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_blank() {
            f.write_str("ApiKey(<empty>)")
        } else {
            f.write_str("ApiKey(***)")
        }
    }
}

/// Screening configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SIEVE_*` overrides on top of defaults, then
/// [`Config::validate`] before doing any work.
#[derive(Debug, Clone)]
pub struct Config {
    /// Provider credential shared by the embedder and the scorer.
    pub api_key: ApiKey,

    /// Directory holding reference proposals. Default: `./database`.
    pub corpus_dir: PathBuf,

    /// File extension of eligible corpus documents. Default: `pdf`.
    pub corpus_extension: String,

    /// Matches kept in top-k mode. Default: `3`.
    pub top_k: usize,

    /// Similarity at or above which a match is flagged. Default: `0.70`.
    pub similarity_threshold: f32,

    /// Concurrent per-document tasks during a scan. Default: `4`.
    pub max_concurrency: usize,

    /// Per-call embedding timeout. Default: 30s.
    pub embed_timeout: Duration,

    /// Timeout for the rubric scoring call. Default: 120s.
    pub scoring_timeout: Duration,

    pub embedding_model: String,

    /// Expected fingerprint dimension for `embedding_model`. Default: `768`.
    pub embedding_dim: usize,

    pub scoring_model: String,

    /// Provider root for embedding, scoring and model listing.
    /// Default: `https://generativelanguage.googleapis.com`.
    pub api_base_url: String,

    /// Max fingerprints held in memory. Default: `10_000`.
    pub cache_capacity: u64,

    /// Optional JSON snapshot for the fingerprint cache.
    pub cache_path: Option<PathBuf>,

    /// Characters of text sent per embedding call. Default: `30_000`.
    pub max_embed_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: ApiKey::default(),
            corpus_dir: PathBuf::from(DEFAULT_CORPUS_DIR),
            corpus_extension: DEFAULT_CORPUS_EXTENSION.to_string(),
            top_k: DEFAULT_TOP_K,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            embed_timeout: Duration::from_secs(DEFAULT_EMBED_TIMEOUT_SECS),
            scoring_timeout: Duration::from_secs(DEFAULT_SCORING_TIMEOUT_SECS),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            scoring_model: DEFAULT_SCORING_MODEL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache_path: None,
            max_embed_chars: DEFAULT_MAX_EMBED_CHARS,
        }
    }
}

impl Config {
    pub const ENV_API_KEY: &'static str = "SIEVE_API_KEY";
    /// Fallback credential variable, read when [`Self::ENV_API_KEY`] is unset.
    pub const ENV_GOOGLE_API_KEY: &'static str = "GOOGLE_API_KEY";
    const ENV_CORPUS_DIR: &'static str = "SIEVE_CORPUS_DIR";
    const ENV_CORPUS_EXTENSION: &'static str = "SIEVE_CORPUS_EXTENSION";
    const ENV_TOP_K: &'static str = "SIEVE_TOP_K";
    const ENV_SIMILARITY_THRESHOLD: &'static str = "SIEVE_SIMILARITY_THRESHOLD";
    const ENV_MAX_CONCURRENCY: &'static str = "SIEVE_MAX_CONCURRENCY";
    const ENV_EMBED_TIMEOUT_SECS: &'static str = "SIEVE_EMBED_TIMEOUT_SECS";
    const ENV_SCORING_TIMEOUT_SECS: &'static str = "SIEVE_SCORING_TIMEOUT_SECS";
    const ENV_EMBEDDING_MODEL: &'static str = "SIEVE_EMBEDDING_MODEL";
    const ENV_EMBEDDING_DIM: &'static str = "SIEVE_EMBEDDING_DIM";
    const ENV_SCORING_MODEL: &'static str = "SIEVE_SCORING_MODEL";
    const ENV_API_BASE_URL: &'static str = "SIEVE_API_BASE_URL";
    const ENV_CACHE_CAPACITY: &'static str = "SIEVE_CACHE_CAPACITY";
    const ENV_CACHE_PATH: &'static str = "SIEVE_CACHE_PATH";
    const ENV_MAX_EMBED_CHARS: &'static str = "SIEVE_MAX_EMBED_CHARS";

    /// Loads configuration from environment variables (falling back to defaults).
    ///
    /// Fails with [`ConfigError::MissingEnvVar`] when no API key is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_key = Self::parse_api_key_from_env()?;
        let corpus_dir = Self::parse_path_from_env(Self::ENV_CORPUS_DIR, defaults.corpus_dir);
        let corpus_extension =
            Self::parse_string_from_env(Self::ENV_CORPUS_EXTENSION, defaults.corpus_extension);
        let top_k = Self::parse_from_env(Self::ENV_TOP_K, defaults.top_k)?;
        let similarity_threshold =
            Self::parse_from_env(Self::ENV_SIMILARITY_THRESHOLD, defaults.similarity_threshold)?;
        let max_concurrency =
            Self::parse_from_env(Self::ENV_MAX_CONCURRENCY, defaults.max_concurrency)?;
        let embed_timeout = Duration::from_secs(Self::parse_from_env(
            Self::ENV_EMBED_TIMEOUT_SECS,
            defaults.embed_timeout.as_secs(),
        )?);
        let scoring_timeout = Duration::from_secs(Self::parse_from_env(
            Self::ENV_SCORING_TIMEOUT_SECS,
            defaults.scoring_timeout.as_secs(),
        )?);
        let embedding_model =
            Self::parse_string_from_env(Self::ENV_EMBEDDING_MODEL, defaults.embedding_model);
        let embedding_dim = Self::parse_from_env(Self::ENV_EMBEDDING_DIM, defaults.embedding_dim)?;
        let scoring_model =
            Self::parse_string_from_env(Self::ENV_SCORING_MODEL, defaults.scoring_model);
        let api_base_url =
            Self::parse_string_from_env(Self::ENV_API_BASE_URL, defaults.api_base_url);
        let cache_capacity =
            Self::parse_from_env(Self::ENV_CACHE_CAPACITY, defaults.cache_capacity)?;
        let cache_path = Self::parse_optional_path_from_env(Self::ENV_CACHE_PATH);
        let max_embed_chars =
            Self::parse_from_env(Self::ENV_MAX_EMBED_CHARS, defaults.max_embed_chars)?;

        Ok(Self {
            api_key,
            corpus_dir,
            corpus_extension,
            top_k,
            similarity_threshold,
            max_concurrency,
            embed_timeout,
            scoring_timeout,
            embedding_model,
            embedding_dim,
            scoring_model,
            api_base_url,
            cache_capacity,
            cache_path,
            max_embed_chars,
        })
    }

    /// Validates the credential, ranges, and paths (does not create directories).
    ///
    /// A corpus directory that does not exist yet is allowed; the novelty check
    /// reports it as unavailable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.is_blank() {
            return Err(ConfigError::InvalidSetting {
                field: "api_key",
                reason: "provider API key is empty".to_string(),
            });
        }

        if self.corpus_dir.exists() && !self.corpus_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.corpus_dir.clone(),
            });
        }

        if self.corpus_extension.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                field: "corpus_extension",
                reason: "must not be empty".to_string(),
            });
        }

        if self.top_k == 0 {
            return Err(ConfigError::InvalidSetting {
                field: "top_k",
                reason: "must be at least 1".to_string(),
            });
        }

        if !(-1.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::InvalidSetting {
                field: "similarity_threshold",
                reason: format!("{} is outside [-1, 1]", self.similarity_threshold),
            });
        }

        if self.max_concurrency == 0 {
            return Err(ConfigError::InvalidSetting {
                field: "max_concurrency",
                reason: "must be at least 1".to_string(),
            });
        }

        if self.embed_timeout.is_zero() || self.scoring_timeout.is_zero() {
            return Err(ConfigError::InvalidSetting {
                field: "timeout",
                reason: "timeouts must be greater than zero".to_string(),
            });
        }

        if self.embedding_dim == 0 {
            return Err(ConfigError::InvalidSetting {
                field: "embedding_dim",
                reason: "must be at least 1".to_string(),
            });
        }

        if self.max_embed_chars == 0 {
            return Err(ConfigError::InvalidSetting {
                field: "max_embed_chars",
                reason: "must be at least 1".to_string(),
            });
        }

        if let Some(ref path) = self.cache_path
            && path.is_dir()
        {
            return Err(ConfigError::InvalidSetting {
                field: "cache_path",
                reason: format!("{} is a directory", path.display()),
            });
        }

        Ok(())
    }

    /// Returns a copy with a different corpus directory (CLI override).
    pub fn with_corpus_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.corpus_dir = dir.into();
        self
    }

    /// Config for tests: a dummy key and the given corpus directory.
    #[cfg(any(test, feature = "mock"))]
    pub fn for_testing(corpus_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_key: ApiKey::new("test-key"),
            corpus_dir: corpus_dir.into(),
            embedding_dim: 8,
            ..Default::default()
        }
    }

    fn parse_api_key_from_env() -> Result<ApiKey, ConfigError> {
        let raw = env::var(Self::ENV_API_KEY)
            .or_else(|_| env::var(Self::ENV_GOOGLE_API_KEY))
            .map_err(|_| ConfigError::MissingEnvVar {
                name: Self::ENV_API_KEY,
            })?;

        let key = ApiKey::new(raw.trim());
        if key.is_blank() {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_API_KEY,
                value: String::new(),
                reason: "API key is blank".to_string(),
            });
        }
        Ok(key)
    }

    fn parse_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidValue {
                    name: var_name,
                    value: value.clone(),
                    reason: e.to_string(),
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }
}
