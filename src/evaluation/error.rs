use thiserror::Error;

/// Failures talking to the scoring model.
///
/// [`ProposalScorer`](super::ProposalScorer) never returns these directly; they are
/// folded into [`EvaluationOutcome::Failed`](super::EvaluationOutcome::Failed).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("proposal text is empty")]
    EmptyInput,

    #[error("scoring provider rejected the API key (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("scoring provider error: {reason}")]
    Provider { reason: String },

    #[error("scoring request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("scoring model returned no text")]
    EmptyResponse,
}
