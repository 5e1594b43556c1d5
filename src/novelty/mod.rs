//! Novelty detection: score a proposal against every corpus document.
//!
//! [`NoveltyChecker`] owns one scan primitive. Per eligible document it reads the
//! bytes, extracts text on the blocking pool, fingerprints it (or reuses a cached
//! fingerprint for identical bytes), and compares it with the query fingerprint.
//! Documents run through a bounded `buffer_unordered` pool; results are tagged with
//! their traversal index and sorted once at the end, so the output does not depend
//! on completion order.
//!
//! A document that fails at any step is excluded and logged at `warn`; it never
//! aborts the scan. The only hard error inside a scan is a fingerprint dimension
//! mismatch, which means the provider broke its contract.
//!
//! Ranking shapes ([`best_match`](NoveltyChecker::best_match),
//! [`top_k`](NoveltyChecker::top_k), [`full_ranking`](NoveltyChecker::full_ranking))
//! are [`RankingPolicy`] applied to the same sorted list.

mod error;
mod originality;
mod types;


pub use error::NoveltyError;
pub use originality::originality_percent;
pub use types::{MatchResult, NoveltyAssessment, RankingPolicy, ScanSummary, UnavailableReason};

use std::path::PathBuf;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::cache::FingerprintCache;
use crate::config::Config;
use crate::corpus::{CorpusDocument, CorpusStore};
use crate::embedding::{
    AcquireOptions, DOCUMENT_TASK, EmbeddingProvider, Fingerprint, acquire_fingerprint,
};
use crate::extract::{TextExtractor, extract_blocking};
use crate::hashing::KeyScope;
use crate::similarity::{ComparisonError, cosine_similarity};

enum Exclusion {
    Extraction,
    Embedding,
    Comparison,
    Mismatch { document_dim: usize },
}

struct DocumentScore {
    cache_hit: bool,
    outcome: Result<f32, Exclusion>,
}

/// Compares proposal fingerprints against the corpus directory.
pub struct NoveltyChecker<E, X> {
    embedder: Arc<E>,
    extractor: Arc<X>,
    corpus: CorpusStore,
    cache: Option<Arc<FingerprintCache>>,
    persist_path: Option<PathBuf>,
    top_k: usize,
    threshold: f32,
    max_concurrency: usize,
    acquire: AcquireOptions,
}

impl<E, X> NoveltyChecker<E, X>
where
    E: EmbeddingProvider,
    X: TextExtractor + 'static,
{
    /// Checker without a fingerprint cache.
    pub fn new(config: &Config, embedder: Arc<E>, extractor: Arc<X>) -> Self {
        Self {
            embedder,
            extractor,
            corpus: CorpusStore::from_config(config),
            cache: None,
            persist_path: None,
            top_k: config.top_k,
            threshold: config.similarity_threshold,
            max_concurrency: config.max_concurrency.max(1),
            acquire: AcquireOptions::from_config(config),
        }
    }

    pub fn with_cache(mut self, cache: Arc<FingerprintCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Saves the cache to `path` after any scan that added fingerprints.
    pub fn persist_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.persist_path = Some(path.into());
        self
    }

    pub fn corpus(&self) -> &CorpusStore {
        &self.corpus
    }

    pub fn cache(&self) -> Option<&Arc<FingerprintCache>> {
        self.cache.as_ref()
    }

    /// `TopK` with the configured `k`.
    pub fn default_policy(&self) -> RankingPolicy {
        RankingPolicy::TopK(self.top_k)
    }

    /// Ranked matches for `query`, most similar first.
    ///
    /// An empty corpus, or one where every document was excluded, yields an empty
    /// vector. So does a degenerate query (empty, zero-magnitude or non-finite):
    /// nothing can be compared with it, and no corpus document is fingerprinted.
    pub async fn rank(
        &self,
        query: &Fingerprint,
        policy: RankingPolicy,
    ) -> Result<Vec<MatchResult>, NoveltyError> {
        self.rank_with_summary(query, policy)
            .await
            .map(|(matches, _)| matches)
    }

    /// [`rank`](Self::rank) plus the scan bookkeeping.
    pub async fn rank_with_summary(
        &self,
        query: &Fingerprint,
        policy: RankingPolicy,
    ) -> Result<(Vec<MatchResult>, ScanSummary), NoveltyError> {
        let (ranked, summary) = self.scan(query).await?;
        Ok((policy.apply(ranked), summary))
    }

    pub async fn best_match(&self, query: &Fingerprint) -> Result<Option<MatchResult>, NoveltyError> {
        let mut ranked = self.rank(query, RankingPolicy::TopK(1)).await?;
        Ok(ranked.pop())
    }

    pub async fn top_k(
        &self,
        query: &Fingerprint,
        k: usize,
    ) -> Result<Vec<MatchResult>, NoveltyError> {
        self.rank(query, RankingPolicy::TopK(k)).await
    }

    pub async fn full_ranking(&self, query: &Fingerprint) -> Result<Vec<MatchResult>, NoveltyError> {
        self.rank(query, RankingPolicy::Full).await
    }

    /// Text-level entry point: fingerprints `query_text`, then ranks the corpus.
    pub async fn check(&self, query_text: &str, policy: RankingPolicy) -> NoveltyAssessment {
        let query = match acquire_fingerprint(self.embedder.as_ref(), query_text, self.acquire).await
        {
            Ok(fingerprint) => fingerprint,
            Err(e) => {
                warn!(error = %e, "Novelty check unavailable: query fingerprint failed");
                return NoveltyAssessment::Unavailable {
                    reason: UnavailableReason::QueryEmbedding {
                        message: e.to_string(),
                    },
                };
            }
        };

        if query.is_degenerate() {
            warn!(dim = query.dim(), "Novelty check unavailable: degenerate query fingerprint");
            return NoveltyAssessment::Unavailable {
                reason: UnavailableReason::DegenerateQuery,
            };
        }

        let (matches, scan) = match self.rank_with_summary(&query, policy).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Novelty check unavailable");
                let reason = match e {
                    NoveltyError::CorpusUnreadable(source) => UnavailableReason::CorpusUnreadable {
                        message: source.to_string(),
                    },
                    NoveltyError::DimensionMismatch {
                        document,
                        query_dim,
                        document_dim,
                    } => UnavailableReason::DimensionMismatch {
                        document,
                        query_dim,
                        document_dim,
                    },
                };
                return NoveltyAssessment::Unavailable { reason };
            }
        };

        match matches.first() {
            None => NoveltyAssessment::NoReferences { scan },
            Some(top) => {
                let originality = originality_percent(top.similarity);
                NoveltyAssessment::Assessed {
                    matches,
                    originality,
                    scan,
                }
            }
        }
    }

    async fn scan(&self, query: &Fingerprint) -> Result<(Vec<MatchResult>, ScanSummary), NoveltyError> {
        let documents = self.corpus.list_documents().await?;
        let mut summary = ScanSummary {
            eligible: documents.len(),
            ..Default::default()
        };

        if query.is_degenerate() {
            warn!(
                dim = query.dim(),
                eligible = summary.eligible,
                "Degenerate query fingerprint; nothing to rank"
            );
            summary.excluded_comparison = summary.eligible;
            return Ok((Vec::new(), summary));
        }

        let mut outcomes: Vec<(usize, &CorpusDocument, DocumentScore)> =
            stream::iter(documents.iter().enumerate())
                .map(|(idx, doc)| async move { (idx, doc, self.score_document(doc, query).await) })
                .buffer_unordered(self.max_concurrency)
                .collect()
                .await;

        outcomes.sort_unstable_by_key(|(idx, _, _)| *idx);

        let mut ranked = Vec::with_capacity(outcomes.len());
        for (_, doc, score) in outcomes {
            if score.cache_hit {
                summary.cache_hits += 1;
            }
            match score.outcome {
                Ok(similarity) => {
                    summary.scored += 1;
                    ranked.push(MatchResult::new(doc.name(), similarity, self.threshold));
                }
                Err(Exclusion::Extraction) => summary.excluded_extraction += 1,
                Err(Exclusion::Embedding) => summary.excluded_embedding += 1,
                Err(Exclusion::Comparison) => summary.excluded_comparison += 1,
                Err(Exclusion::Mismatch { document_dim }) => {
                    return Err(NoveltyError::DimensionMismatch {
                        document: doc.name().to_string(),
                        query_dim: query.dim(),
                        document_dim,
                    });
                }
            }
        }

        // Stable: equal scores keep traversal order.
        ranked.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));

        info!(
            corpus = %self.corpus.dir().display(),
            eligible = summary.eligible,
            scored = summary.scored,
            excluded = summary.excluded(),
            cache_hits = summary.cache_hits,
            "Corpus scan complete"
        );

        self.persist_cache().await;

        Ok((ranked, summary))
    }

    async fn score_document(&self, doc: &CorpusDocument, query: &Fingerprint) -> DocumentScore {
        let (fingerprint, cache_hit) = match self.fingerprint_document(doc).await {
            Ok(found) => found,
            Err(exclusion) => {
                return DocumentScore {
                    cache_hit: false,
                    outcome: Err(exclusion),
                };
            }
        };

        let outcome = match cosine_similarity(query.as_slice(), fingerprint.as_slice()) {
            Ok(similarity) => {
                debug!(document = doc.name(), similarity, cache_hit, "Document scored");
                Ok(similarity)
            }
            Err(ComparisonError::DimensionMismatch { right, .. }) => {
                Err(Exclusion::Mismatch { document_dim: right })
            }
            Err(e) => {
                warn!(document = doc.name(), error = %e, "Corpus document excluded: comparison failed");
                Err(Exclusion::Comparison)
            }
        };

        DocumentScore { cache_hit, outcome }
    }

    async fn fingerprint_document(
        &self,
        doc: &CorpusDocument,
    ) -> Result<(Fingerprint, bool), Exclusion> {
        let bytes = doc.load_bytes().await.map_err(|e| {
            warn!(document = doc.name(), error = %e, "Corpus document excluded: read failed");
            Exclusion::Extraction
        })?;

        let key = self
            .cache
            .as_ref()
            .map(|_| FingerprintCache::key_for(&bytes, &self.key_scope()));

        if let (Some(cache), Some(key)) = (&self.cache, &key)
            && let Some(fingerprint) = cache.lookup(key)
        {
            return Ok((fingerprint, true));
        }

        let text = extract_blocking(Arc::clone(&self.extractor), bytes)
            .await
            .map_err(|e| {
                warn!(document = doc.name(), error = %e, "Corpus document excluded: extraction failed");
                Exclusion::Extraction
            })?;

        let fingerprint = acquire_fingerprint(self.embedder.as_ref(), &text, self.acquire)
            .await
            .map_err(|e| {
                warn!(document = doc.name(), error = %e, "Corpus document excluded: fingerprint failed");
                Exclusion::Embedding
            })?;

        if let (Some(cache), Some(key)) = (&self.cache, key)
            && !fingerprint.is_degenerate()
        {
            cache.insert(key, fingerprint.clone());
        }

        Ok((fingerprint, false))
    }

    fn key_scope(&self) -> KeyScope<'_> {
        KeyScope {
            model: self.embedder.model_id(),
            task: DOCUMENT_TASK,
            extractor: self.extractor.id(),
            max_chars: self.acquire.max_chars,
        }
    }

    /// Writes the snapshot on the blocking pool, only when the cache changed.
    async fn persist_cache(&self) {
        let (Some(cache), Some(path)) = (&self.cache, &self.persist_path) else {
            return;
        };
        if !cache.take_dirty() {
            debug!(path = %path.display(), "Fingerprint cache unchanged; skipping save");
            return;
        }

        let cache = Arc::clone(cache);
        let target = path.clone();
        let saved = tokio::task::spawn_blocking(move || {
            let result = cache.save_snapshot(&target);
            if result.is_err() {
                cache.mark_dirty();
            }
            result
        })
        .await;

        match saved {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                warn!(path = %path.display(), error = %e, "Failed to save fingerprint cache");
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Fingerprint cache save task failed");
            }
        }
    }
}

impl<E, X> std::fmt::Debug for NoveltyChecker<E, X> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoveltyChecker")
            .field("corpus", &self.corpus)
            .field("top_k", &self.top_k)
            .field("threshold", &self.threshold)
            .field("max_concurrency", &self.max_concurrency)
            .field("cached", &self.cache.is_some())
            .finish()
    }
}
