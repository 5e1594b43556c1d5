//! Cosine similarity between fingerprints.
//!
//! Unlike a plain `f32` helper, [`cosine_similarity`] never returns NaN or infinity:
//! zero-magnitude and non-finite inputs are typed errors, and mismatched dimensions
//! are a contract violation reported as [`ComparisonError::DimensionMismatch`].

mod error;


pub use error::ComparisonError;

/// `dot(a, b) / (|a| * |b|)`, clamped to `[-1, 1]`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, ComparisonError> {
    if a.len() != b.len() {
        return Err(ComparisonError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    if a.is_empty() {
        return Err(ComparisonError::ZeroMagnitude);
    }

    let (dot, norm_a_sq, norm_b_sq) =
        a.iter()
            .zip(b.iter())
            .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (&av, &bv)| {
                (dot + av * bv, na + av * av, nb + bv * bv)
            });

    if !dot.is_finite() || !norm_a_sq.is_finite() || !norm_b_sq.is_finite() {
        return Err(ComparisonError::NonFinite);
    }

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(ComparisonError::ZeroMagnitude);
    }

    let similarity = dot / (norm_a * norm_b);
    if !similarity.is_finite() {
        return Err(ComparisonError::NonFinite);
    }

    Ok(similarity.clamp(-1.0, 1.0))
}
