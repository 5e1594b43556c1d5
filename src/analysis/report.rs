use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::evaluation::EvaluationOutcome;
use crate::novelty::NoveltyAssessment;

/// Everything one analysis produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// File name of the uploaded proposal.
    pub source: String,
    /// Characters of extracted text.
    pub characters: usize,
    pub novelty: NoveltyAssessment,
    pub evaluation: EvaluationOutcome,
}

impl AnalysisReport {
    pub fn new(
        source: impl Into<String>,
        characters: usize,
        novelty: NoveltyAssessment,
        evaluation: EvaluationOutcome,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            source: source.into(),
            characters,
            novelty,
            evaluation,
        }
    }
}
