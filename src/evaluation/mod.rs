//! Rubric evaluation by an external generative model.
//!
//! The model is asked for clarity, novelty and feasibility scores (1-10, one
//! justification each) plus strengths and weaknesses, as JSON. A reply that does
//! not parse or has out-of-range scores is kept verbatim as
//! [`EvaluationOutcome::Unstructured`]; a failed call becomes
//! [`EvaluationOutcome::Failed`]. Nothing here panics or returns `Err` to the
//! caller.

mod error;
mod gemini;
mod prompt;
mod types;

#[cfg(test)]
mod tests;

pub use error::EvaluationError;
pub use gemini::{
    GeminiScorer, ModelPage, api_root, classify_list_status, list_models, parse_model_list,
};
pub use prompt::{build_prompt, json_payload, parse_reply};
pub use types::{
    DimensionScore, EvaluationOutcome, IMPROVEMENT_CUTOFF, Potential, RubricEvaluation,
    SCORE_RANGE,
};

use std::future::Future;

/// External rubric scoring service.
pub trait ProposalScorer: Send + Sync {
    fn evaluate(&self, text: &str) -> impl Future<Output = EvaluationOutcome> + Send;
}

#[cfg(any(test, feature = "mock"))]
mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::{EvaluationOutcome, ProposalScorer, RubricEvaluation, parse_reply};

    enum Reply {
        Text(String),
        Fail(String),
    }

    /// Scorer that returns a canned reply. Replies go through [`parse_reply`], so the
    /// parsing path is exercised the same way as with a real model.
    pub struct MockScorer {
        reply: Reply,
        calls: AtomicUsize,
    }

    impl MockScorer {
        /// Replies with `rubric` as fenced JSON.
        pub fn structured(rubric: &RubricEvaluation) -> Self {
            let json = serde_json::to_string_pretty(rubric).unwrap_or_default();
            Self::raw(format!("```json\n{json}\n```"))
        }

        pub fn raw(reply: impl Into<String>) -> Self {
            Self {
                reply: Reply::Text(reply.into()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing(message: impl Into<String>) -> Self {
            Self {
                reply: Reply::Fail(message.into()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ProposalScorer for MockScorer {
        async fn evaluate(&self, _text: &str) -> EvaluationOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Reply::Text(text) => parse_reply(text),
                Reply::Fail(message) => EvaluationOutcome::Failed(message.clone()),
            }
        }
    }
}

#[cfg(any(test, feature = "mock"))]
pub use mock::MockScorer;

/// Rubric with the given scores and placeholder text.
#[cfg(any(test, feature = "mock"))]
pub fn sample_rubric(clarity: u8, novelty: u8, feasibility: u8) -> RubricEvaluation {
    RubricEvaluation {
        clarity_score: DimensionScore::new(clarity, "States its objectives precisely."),
        novelty_score: DimensionScore::new(novelty, "Combines known methods in a new setting."),
        feasibility_score: DimensionScore::new(feasibility, "Work plan has realistic milestones."),
        strengths: "Strong preliminary data. Experienced team.".to_string(),
        weaknesses: "Budget justification is thin. Risks are not quantified.".to_string(),
    }
}
