use serde::{Deserialize, Serialize};

/// Dense semantic embedding of one document. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint {
    values: Vec<f32>,
}

impl Fingerprint {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.values.len()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f32 {
        self.values.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    /// `true` when the vector cannot take part in a cosine comparison: empty, zero
    /// magnitude, or containing NaN/infinity.
    pub fn is_degenerate(&self) -> bool {
        if self.values.is_empty() || self.values.iter().any(|v| !v.is_finite()) {
            return true;
        }
        self.norm() == 0.0
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.values
    }
}

impl From<Vec<f32>> for Fingerprint {
    fn from(values: Vec<f32>) -> Self {
        Self::new(values)
    }
}

impl AsRef<[f32]> for Fingerprint {
    fn as_ref(&self) -> &[f32] {
        &self.values
    }
}
