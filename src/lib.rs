//! Sieve library crate (used by the `sieve` binary and integration tests).
//!
//! Screens research proposals: extracts the text of an uploaded PDF, ranks a corpus
//! of earlier proposals by semantic similarity to it, and asks a generative model
//! for a rubric evaluation.
//!
//! # Public API Surface
//!
//! ## Pipeline
//! - [`Analyzer`], [`GeminiAnalyzer`], [`AnalysisReport`] - one uploaded proposal end to end
//! - [`NoveltyChecker`], [`NoveltyAssessment`], [`MatchResult`], [`RankingPolicy`] - corpus ranking
//! - [`originality_percent`] - top similarity projected onto 0-100
//!
//! ## Collaborator Seams
//! - [`TextExtractor`] / [`PdfTextExtractor`] - PDF bytes to text
//! - [`EmbeddingProvider`] / [`GeminiEmbedder`] - text to [`Fingerprint`]
//! - [`ProposalScorer`] / [`GeminiScorer`] - rubric evaluation
//!
//! ## Utilities
//! - [`cosine_similarity`] - NaN-free cosine similarity
//! - [`FingerprintCache`] - content-hash keyed fingerprint reuse
//! - [`Config`], [`ApiKey`] - environment-backed configuration
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod analysis;
pub mod cache;
pub mod config;
pub mod constants;
pub mod corpus;
pub mod embedding;
pub mod evaluation;
pub mod extract;
pub mod hashing;
pub mod novelty;
pub mod similarity;

pub use analysis::{AnalysisError, AnalysisReport, Analyzer, GeminiAnalyzer};
pub use cache::{CacheError, CacheStats, FingerprintCache};
pub use config::{ApiKey, Config, ConfigError};
pub use constants::{DimValidationError, validate_embedding_dim};
pub use corpus::{CorpusDocument, CorpusError, CorpusStore};
pub use embedding::{
    AcquireOptions, EmbeddingError, EmbeddingProvider, Fingerprint, GeminiEmbedder, TaskType,
    acquire_fingerprint,
};
#[cfg(any(test, feature = "mock"))]
pub use embedding::{MockEmbeddingProvider, stub_vector};
pub use evaluation::{
    DimensionScore, EvaluationError, EvaluationOutcome, GeminiScorer, Potential,
    ProposalScorer, RubricEvaluation, list_models,
};
#[cfg(any(test, feature = "mock"))]
pub use evaluation::{MockScorer, sample_rubric};
#[cfg(any(test, feature = "mock"))]
pub use extract::MockTextExtractor;
pub use extract::{ExtractionError, PdfTextExtractor, TextExtractor};
pub use hashing::{KeyScope, fingerprint_key, hash_content};
pub use novelty::{
    MatchResult, NoveltyAssessment, NoveltyChecker, NoveltyError, RankingPolicy, ScanSummary,
    UnavailableReason, originality_percent,
};
pub use similarity::{ComparisonError, cosine_similarity};
