//! End-to-end analysis of one uploaded proposal.
//!
//! Extraction of the uploaded document is the only fatal step: without its text
//! there is nothing to compare or score. After that the novelty check and the
//! rubric evaluation run concurrently and each reports its own outcome.

mod error;
mod report;


pub use error::AnalysisError;
pub use report::AnalysisReport;

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::cache::FingerprintCache;
use crate::config::Config;
use crate::embedding::{EmbeddingProvider, GeminiEmbedder};
use crate::evaluation::{GeminiScorer, ProposalScorer};
use crate::extract::{PdfTextExtractor, TextExtractor, extract_blocking};
use crate::novelty::{NoveltyChecker, RankingPolicy};

/// Analyzer wired to the Gemini services and `pdf-extract`.
pub type GeminiAnalyzer = Analyzer<GeminiEmbedder, PdfTextExtractor, GeminiScorer>;

pub struct Analyzer<E, X, S> {
    checker: NoveltyChecker<E, X>,
    extractor: Arc<X>,
    scorer: S,
    policy: RankingPolicy,
}

impl GeminiAnalyzer {
    /// Validates `config` and builds the production pipeline, including the
    /// fingerprint cache (and its snapshot, when configured).
    pub fn from_config(config: &Config) -> Result<Self, AnalysisError> {
        config.validate()?;

        let embedder = Arc::new(GeminiEmbedder::new(config)?);
        let extractor = Arc::new(PdfTextExtractor::new());
        let cache = Arc::new(FingerprintCache::from_config(config));

        let mut checker = NoveltyChecker::new(config, embedder, Arc::clone(&extractor))
            .with_cache(cache);
        if let Some(path) = &config.cache_path {
            checker = checker.persist_to(path);
        }

        Ok(Self::new(checker, extractor, GeminiScorer::new(config)))
    }
}

impl<E, X, S> Analyzer<E, X, S>
where
    E: EmbeddingProvider,
    X: TextExtractor + 'static,
    S: ProposalScorer,
{
    pub fn new(checker: NoveltyChecker<E, X>, extractor: Arc<X>, scorer: S) -> Self {
        let policy = checker.default_policy();
        Self {
            checker,
            extractor,
            scorer,
            policy,
        }
    }

    pub fn with_policy(mut self, policy: RankingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> RankingPolicy {
        self.policy
    }

    pub fn checker(&self) -> &NoveltyChecker<E, X> {
        &self.checker
    }

    /// Reads `path` and analyzes it under its file name.
    pub async fn analyze_file(&self, path: &Path) -> Result<AnalysisReport, AnalysisError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| AnalysisError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.analyze(&name, bytes).await
    }

    pub async fn analyze(
        &self,
        source_name: &str,
        bytes: Vec<u8>,
    ) -> Result<AnalysisReport, AnalysisError> {
        let text = extract_blocking(Arc::clone(&self.extractor), bytes)
            .await
            .map_err(|source| AnalysisError::Extraction {
                source_name: source_name.to_string(),
                source,
            })?;
        let characters = text.chars().count();

        info!(source = source_name, characters, "Proposal text extracted");

        let (novelty, evaluation) = tokio::join!(
            self.checker.check(&text, self.policy),
            self.scorer.evaluate(&text),
        );

        info!(
            source = source_name,
            assessed = novelty.is_assessed(),
            originality = novelty.originality(),
            structured = evaluation.rubric().is_some(),
            "Analysis complete"
        );

        Ok(AnalysisReport::new(source_name, characters, novelty, evaluation))
    }
}

impl<E, X, S> std::fmt::Debug for Analyzer<E, X, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("checker", &self.checker)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
