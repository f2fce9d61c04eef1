//! Cosine similarity over embedding vectors.

use insight_core::errors::ClusteringError;

/// Cosine similarity between two vectors, in `[-1, 1]`.
///
/// Vectors must have equal length. A zero-magnitude vector has no
/// direction, so its similarity to anything is 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, ClusteringError> {
    if a.len() != b.len() {
        return Err(ClusteringError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    let (mut dot, mut mag_a, mut mag_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }
    let denom = mag_a.sqrt() * mag_b.sqrt();
    if denom < f64::EPSILON {
        Ok(0.0)
    } else {
        Ok((dot / denom).clamp(-1.0, 1.0))
    }
}

/// `1 - cosine_similarity`, in `[0, 2]`.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> Result<f64, ClusteringError> {
    cosine_similarity(a, b).map(|s| 1.0 - s)
}
