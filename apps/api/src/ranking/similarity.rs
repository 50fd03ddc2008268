//! Cosine similarity between TF-IDF vectors, scaled to 0 – 100.

use crate::ranking::models::NormalizedText;
use crate::ranking::vectorizer::{SparseVector, TfIdfModel};

pub const MAX_SCORE: f64 = 100.0;

/// `dot(a, b) / (‖a‖·‖b‖)`, or 0.0 when either vector has no weight.
pub fn cosine(a: &SparseVector, b: &SparseVector) -> f64 {
    let denominator = a.norm() * b.norm();
    if denominator == 0.0 {
        return 0.0;
    }
    a.dot(b) / denominator
}

/// Cosine × 100, clamped so rounding never leaves [0, 100].
pub fn to_score(cosine: f64) -> f64 {
    if cosine.is_nan() {
        return 0.0;
    }
    (cosine * MAX_SCORE).clamp(0.0, MAX_SCORE)
}

/// Scores two texts against a vocabulary built from just those two texts.
pub fn score_pair(reference: &NormalizedText, candidate: &NormalizedText) -> f64 {
    let model = TfIdfModel::fit(&[reference, candidate]);
    score_with_model(&model, reference, candidate)
}

/// Scores two texts against an already fitted model.
pub fn score_with_model(
    model: &TfIdfModel,
    reference: &NormalizedText,
    candidate: &NormalizedText,
) -> f64 {
    to_score(cosine(
        &model.transform(reference),
        &model.transform(candidate),
    ))
}
