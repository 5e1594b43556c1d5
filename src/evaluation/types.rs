use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Lowest and highest rubric score.
pub const SCORE_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

/// Scores below this count as an area to improve.
pub const IMPROVEMENT_CUTOFF: u8 = 7;

/// One rubric dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionScore {
    #[serde(deserialize_with = "deserialize_score")]
    pub score: u8,
    #[serde(default)]
    pub justification: String,
}

impl DimensionScore {
    pub fn new(score: u8, justification: impl Into<String>) -> Self {
        Self {
            score,
            justification: justification.into(),
        }
    }
}

/// Structured rubric evaluation as returned by the scoring model.
///
/// Field names are the JSON keys the model is asked to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricEvaluation {
    pub clarity_score: DimensionScore,
    pub novelty_score: DimensionScore,
    pub feasibility_score: DimensionScore,
    pub strengths: String,
    pub weaknesses: String,
}

/// Overall label derived from the average score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Potential {
    Excellent,
    Good,
    Moderate,
    Limited,
}

impl Potential {
    pub fn from_average(average: f32) -> Self {
        if average >= 8.0 {
            Potential::Excellent
        } else if average >= 6.0 {
            Potential::Good
        } else if average >= 4.0 {
            Potential::Moderate
        } else {
            Potential::Limited
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Potential::Excellent => "excellent potential",
            Potential::Good => "good potential",
            Potential::Moderate => "moderate potential",
            Potential::Limited => "limited potential",
        }
    }
}

impl std::fmt::Display for Potential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl RubricEvaluation {
    /// `[clarity, novelty, feasibility]`.
    pub fn scores(&self) -> [u8; 3] {
        [
            self.clarity_score.score,
            self.novelty_score.score,
            self.feasibility_score.score,
        ]
    }

    /// Names paired with their dimension, in rubric order.
    pub fn dimensions(&self) -> [(&'static str, &DimensionScore); 3] {
        [
            ("clarity", &self.clarity_score),
            ("novelty", &self.novelty_score),
            ("feasibility", &self.feasibility_score),
        ]
    }

    pub fn average(&self) -> f32 {
        self.scores().iter().map(|&s| f32::from(s)).sum::<f32>() / 3.0
    }

    pub fn highest(&self) -> u8 {
        self.scores().into_iter().max().unwrap_or(0)
    }

    /// Number of dimensions scored below [`IMPROVEMENT_CUTOFF`].
    pub fn areas_to_improve(&self) -> usize {
        self.scores()
            .iter()
            .filter(|&&s| s < IMPROVEMENT_CUTOFF)
            .count()
    }

    pub fn potential(&self) -> Potential {
        Potential::from_average(self.average())
    }

    /// Checks every score is inside [`SCORE_RANGE`].
    pub fn validate(&self) -> Result<(), String> {
        for (name, dim) in self.dimensions() {
            if !SCORE_RANGE.contains(&dim.score) {
                return Err(format!("{name} score {} outside 1-10", dim.score));
            }
        }
        Ok(())
    }
}

/// What came back from the scoring service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum EvaluationOutcome {
    /// Parsed and validated rubric.
    Structured(RubricEvaluation),
    /// The model answered, but not in the requested shape. Raw text kept.
    Unstructured(String),
    /// The call failed.
    Failed(String),
}

impl EvaluationOutcome {
    pub fn rubric(&self) -> Option<&RubricEvaluation> {
        match self {
            EvaluationOutcome::Structured(rubric) => Some(rubric),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, EvaluationOutcome::Failed(_))
    }
}

/// Accepts `8`, `8.0` and `"8"`; anything fractional or non-numeric is rejected.
fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let number = match &value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| de::Error::custom(format!("score is not a number: {value}")))?;

    if number.fract() != 0.0 || !(0.0..=f64::from(u8::MAX)).contains(&number) {
        return Err(de::Error::custom(format!("score is not a small integer: {number}")));
    }
    Ok(number as u8)
}
