//! Cosine similarity between texts and term vectors.

use crate::vector::{build_vectors_with, IdfWeighting, TermVector};

impl TermVector {
    /// Cosine of the angle between `self` and `other`, clamped to `[0, 1]`.
    ///
    /// Returns 0 when either vector has zero norm.
    pub fn cosine(&self, other: &TermVector) -> f64 {
        let dot: f64 = self
            .iter()
            .map(|(term, weight)| weight * other.weight(term))
            .sum();

        let denom = self.norm() * other.norm();
        if denom == 0.0 {
            return 0.0;
        }

        // Weights are non-negative, so only the upper bound can be overshot.
        (dot / denom).min(1.0)
    }
}

/// TF-IDF cosine similarity between two texts with smoothed IDF (0–1).
pub fn cosine_similarity(text_a: &str, text_b: &str) -> f64 {
    cosine_similarity_with(text_a, text_b, IdfWeighting::default())
}

/// TF-IDF cosine similarity between two texts (0–1).
///
/// Blank input on either side short-circuits to 0 without building vectors.
pub fn cosine_similarity_with(text_a: &str, text_b: &str, weighting: IdfWeighting) -> f64 {
    if text_a.trim().is_empty() || text_b.trim().is_empty() {
        return 0.0;
    }
    let (vec_a, vec_b) = build_vectors_with(text_a, text_b, weighting);
    vec_a.cosine(&vec_b)
}
