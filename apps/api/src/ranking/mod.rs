// Resume ranking engine
// Implements: PDF text extraction, normalization, TF-IDF vectorization,
// cosine scoring, stable ranking, per-request upload staging.
// Extraction and scoring are CPU-bound and must run inside tokio::task::spawn_blocking.

pub mod extractor;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod ranker;
pub mod scratch;
pub mod similarity;
pub mod vectorizer;

#[cfg(test)]
pub(crate) mod fixtures;
