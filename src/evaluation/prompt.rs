//! Rubric prompt and response parsing.

use super::types::{EvaluationOutcome, RubricEvaluation};

const RUBRIC: &str = r#"You are an expert reviewer for a national research grant committee, tasked with providing an initial screening report.
Analyze the R&D proposal below and return a structured evaluation.

Scoring bands:
- Clarity (1-10): 1-3 confusing or vague; 4-6 understandable but lacks detail; 7-8 clear and well-defined; 9-10 exceptionally clear and precise.
- Novelty (1-10): 1-3 incremental or existing work; 4-6 some new elements but largely derivative; 7-8 genuinely novel approach; 9-10 breakthrough idea with high originality.
- Feasibility (1-10): 1-3 major flaws, unlikely to succeed; 4-6 plausible but has significant risks; 7-8 well-defined plan, likely to succeed; 9-10 highly detailed and convincing plan with low risk.

Respond with ONLY a JSON object in a ```json fenced block, shaped exactly like this:
{
  "clarity_score": {"score": <integer 1-10>, "justification": "<one sentence citing a specific aspect of the proposal>"},
  "novelty_score": {"score": <integer 1-10>, "justification": "<one sentence>"},
  "feasibility_score": {"score": <integer 1-10>, "justification": "<one sentence>"},
  "strengths": "<two-sentence summary of the main strength>",
  "weaknesses": "<two-sentence summary of the main weakness>"
}"#;

/// Full prompt for one proposal.
pub fn build_prompt(proposal_text: &str) -> String {
    format!("{RUBRIC}\n\nProposal text:\n\"\"\"\n{proposal_text}\n\"\"\"\n")
}

/// The JSON part of a model reply.
///
/// A fenced reply is cut from the first `{` to the last `}`; anything else is used
/// as-is (trimmed).
pub fn json_payload(reply: &str) -> &str {
    if reply.contains("```")
        && let (Some(start), Some(end)) = (reply.find('{'), reply.rfind('}'))
        && start < end
    {
        return &reply[start..=end];
    }
    reply.trim()
}

/// Parses and validates a model reply. Never fails: unusable replies are kept as
/// [`EvaluationOutcome::Unstructured`].
pub fn parse_reply(reply: &str) -> EvaluationOutcome {
    let parsed = serde_json::from_str::<RubricEvaluation>(json_payload(reply))
        .map_err(|e| e.to_string())
        .and_then(|rubric| rubric.validate().map(|()| rubric));

    match parsed {
        Ok(rubric) => EvaluationOutcome::Structured(rubric),
        Err(reason) => {
            tracing::debug!(%reason, "Scoring reply is not a valid rubric");
            EvaluationOutcome::Unstructured(reply.to_string())
        }
    }
}
