/// Projects the top similarity onto a 0..=100 originality figure.
///
/// `(1 - similarity) * 100`, clamped. A negative similarity (vectors pointing away
/// from each other) still reads as 100% original. Non-finite input maps to 0.
pub fn originality_percent(top_similarity: f32) -> f32 {
    if !top_similarity.is_finite() {
        return 0.0;
    }
    ((1.0 - top_similarity) * 100.0).clamp(0.0, 100.0)
}
