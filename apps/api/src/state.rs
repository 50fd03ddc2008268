use std::sync::Arc;

use crate::config::Config;
use crate::ranking::extractor::{PdfTextExtractor, TextExtractor};
use crate::ranking::normalizer::Normalizer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable extraction backend. Default: PdfTextExtractor.
    pub extractor: Arc<dyn TextExtractor>,
    /// Process-wide normalizer, built once and shared by every request.
    pub normalizer: Arc<Normalizer>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            extractor: Arc::new(PdfTextExtractor),
            normalizer: Arc::new(Normalizer::new()),
        }
    }
}
