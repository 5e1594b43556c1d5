use serde::{Deserialize, Serialize};

use super::originality::originality_percent;

/// How much of the ranked list to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
    /// The `k` most similar documents (fewer if the corpus is smaller).
    TopK(usize),
    /// Every successfully scored document.
    Full,
}

impl RankingPolicy {
    /// Truncates an already sorted list.
    pub fn apply(self, mut ranked: Vec<MatchResult>) -> Vec<MatchResult> {
        if let RankingPolicy::TopK(k) = self {
            ranked.truncate(k);
        }
        ranked
    }
}

/// One corpus document scored against the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Corpus filename.
    pub document: String,
    /// Cosine similarity in `[-1, 1]`.
    pub similarity: f32,
    /// `similarity >= threshold` at scan time. Informational.
    pub exceeds_threshold: bool,
}

impl MatchResult {
    pub fn new(document: impl Into<String>, similarity: f32, threshold: f32) -> Self {
        Self {
            document: document.into(),
            similarity,
            exceeds_threshold: similarity >= threshold,
        }
    }

    /// Originality of the query relative to this one document.
    pub fn uniqueness_percent(&self) -> f32 {
        originality_percent(self.similarity)
    }
}

/// Per-scan bookkeeping. Exclusions are never surfaced as errors, only counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Files with the corpus extension.
    pub eligible: usize,
    /// Documents that produced a similarity score.
    pub scored: usize,
    pub excluded_extraction: usize,
    pub excluded_embedding: usize,
    pub excluded_comparison: usize,
    /// Fingerprints served from the cache instead of the provider.
    pub cache_hits: usize,
}

impl ScanSummary {
    pub fn excluded(&self) -> usize {
        self.excluded_extraction + self.excluded_embedding + self.excluded_comparison
    }
}

/// Why no novelty figure could be produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnavailableReason {
    /// The query text could not be fingerprinted.
    QueryEmbedding { message: String },
    /// The query fingerprint has zero magnitude or non-finite components.
    DegenerateQuery,
    CorpusUnreadable { message: String },
    DimensionMismatch {
        document: String,
        query_dim: usize,
        document_dim: usize,
    },
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnavailableReason::QueryEmbedding { message } => {
                write!(f, "query could not be fingerprinted: {message}")
            }
            UnavailableReason::DegenerateQuery => {
                write!(f, "query fingerprint has zero magnitude")
            }
            UnavailableReason::CorpusUnreadable { message } => {
                write!(f, "corpus unavailable: {message}")
            }
            UnavailableReason::DimensionMismatch {
                document,
                query_dim,
                document_dim,
            } => write!(
                f,
                "fingerprint dimension mismatch for {document}: {query_dim} vs {document_dim}"
            ),
        }
    }
}

/// Result of a text-level novelty check.
///
/// "Could not compute", "nothing to compare against" and "compared" are separate
/// variants and never collapse into each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NoveltyAssessment {
    Unavailable {
        reason: UnavailableReason,
    },
    NoReferences {
        scan: ScanSummary,
    },
    Assessed {
        matches: Vec<MatchResult>,
        /// Projection of the top match, see [`originality_percent`].
        originality: f32,
        scan: ScanSummary,
    },
}

impl NoveltyAssessment {
    pub fn is_assessed(&self) -> bool {
        matches!(self, NoveltyAssessment::Assessed { .. })
    }

    pub fn matches(&self) -> &[MatchResult] {
        match self {
            NoveltyAssessment::Assessed { matches, .. } => matches,
            _ => &[],
        }
    }

    pub fn originality(&self) -> Option<f32> {
        match self {
            NoveltyAssessment::Assessed { originality, .. } => Some(*originality),
            _ => None,
        }
    }

    pub fn scan(&self) -> Option<&ScanSummary> {
        match self {
            NoveltyAssessment::Unavailable { .. } => None,
            NoveltyAssessment::NoReferences { scan } => Some(scan),
            NoveltyAssessment::Assessed { scan, .. } => Some(scan),
        }
    }
}
