//! Fingerprint acquisition.
//!
//! - [`EmbeddingProvider`] is the seam to the external embedding service.
//! - [`GeminiEmbedder`] talks to the Generative Language API over HTTP.
//! - [`acquire_fingerprint`] is what the rest of the crate calls: it rejects empty
//!   text before any network traffic, bounds the input size, and converts a hung
//!   call into [`EmbeddingError::Timeout`].
//!
//! Both the query proposal and corpus documents are embedded in
//! [`TaskType::RetrievalDocument`] mode; there is no separate query mode.

mod error;
mod fingerprint;
/// HTTP provider for the Generative Language API.
pub mod gemini;
#[cfg(any(test, feature = "mock"))]
mod mock;


pub use error::EmbeddingError;
pub use fingerprint::Fingerprint;
pub use gemini::GeminiEmbedder;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockEmbeddingProvider, stub_vector};

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::config::Config;

/// Usage mode sent with every embedding request. The provider biases the embedding
/// geometry by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskType {
    /// Document being indexed for retrieval.
    RetrievalDocument,
    /// Search query against indexed documents.
    RetrievalQuery,
}

impl TaskType {
    /// Wire name used by the provider API.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            TaskType::RetrievalDocument => "RETRIEVAL_DOCUMENT",
            TaskType::RetrievalQuery => "RETRIEVAL_QUERY",
        }
    }
}

/// The task type this crate embeds with.
pub const DOCUMENT_TASK: TaskType = TaskType::RetrievalDocument;

/// External embedding service.
pub trait EmbeddingProvider: Send + Sync {
    /// Fixed model identifier sent with every request.
    fn model_id(&self) -> &str;

    /// Embeds `text` (already validated non-empty) in `task` mode.
    fn embed(
        &self,
        text: &str,
        task: TaskType,
    ) -> impl Future<Output = Result<Fingerprint, EmbeddingError>> + Send;
}

/// Limits applied around every provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcquireOptions {
    pub timeout: Duration,
    /// Longer text is cut on a char boundary before it is sent.
    pub max_chars: usize,
}

impl AcquireOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: config.embed_timeout,
            max_chars: config.max_embed_chars,
        }
    }
}

/// Produces a fingerprint for `text`, or an explicit [`EmbeddingError`].
///
/// Never panics on provider failure; the caller decides whether the error excludes
/// one corpus document or makes the whole check unavailable.
pub async fn acquire_fingerprint<P>(
    provider: &P,
    text: &str,
    options: AcquireOptions,
) -> Result<Fingerprint, EmbeddingError>
where
    P: EmbeddingProvider,
{
    let text = text.trim();
    if text.is_empty() {
        return Err(EmbeddingError::EmptyInput);
    }

    let text = truncate_chars(text, options.max_chars);

    match tokio::time::timeout(options.timeout, provider.embed(text, DOCUMENT_TASK)).await {
        Ok(Ok(fingerprint)) => {
            debug!(
                model = provider.model_id(),
                text_len = text.len(),
                dim = fingerprint.dim(),
                "Fingerprint acquired"
            );
            Ok(fingerprint)
        }
        Ok(Err(e)) => {
            debug!(model = provider.model_id(), error = %e, "Embedding call failed");
            Err(e)
        }
        Err(_) => {
            debug!(
                model = provider.model_id(),
                timeout_secs = options.timeout.as_secs(),
                "Embedding call timed out"
            );
            Err(EmbeddingError::Timeout {
                secs: options.timeout.as_secs(),
            })
        }
    }
}

/// Returns at most `max_chars` characters of `text`, never splitting a char.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
