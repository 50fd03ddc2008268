//! Ranking pipeline — the two entry points the HTTP layer calls.
//!
//! `extract_and_normalize` turns one uploaded document into `NormalizedText`;
//! `rank_candidates` scores every candidate against the reference and sorts.
//! Both are synchronous and CPU-bound; callers on the async runtime must run
//! them inside `tokio::task::spawn_blocking`.

use tracing::{debug, warn};

use crate::errors::RankError;
use crate::ranking::extractor::TextExtractor;
use crate::ranking::models::{
    Document, NormalizedText, RankedResult, RankingOptions, ScoreEntry, VocabularyMode,
};
use crate::ranking::normalizer::Normalizer;
use crate::ranking::ranker::rank;
use crate::ranking::similarity::{score_pair, score_with_model};
use crate::ranking::vectorizer::TfIdfModel;

pub fn extract_and_normalize(
    extractor: &dyn TextExtractor,
    normalizer: &Normalizer,
    bytes: &[u8],
) -> Result<NormalizedText, RankError> {
    let raw_text = extractor.extract(bytes)?;
    Ok(normalizer.normalize(&raw_text))
}

/// Same flow as `extract_and_normalize`, keeping the raw text and identifier.
pub fn load_document(
    id: &str,
    bytes: &[u8],
    extractor: &dyn TextExtractor,
    normalizer: &Normalizer,
) -> Result<Document, RankError> {
    let raw_text = extractor.extract(bytes)?;
    let normalized = normalizer.normalize(&raw_text);
    Ok(Document {
        id: id.to_string(),
        raw_text,
        normalized,
    })
}

pub fn rank_candidates(
    reference: &NormalizedText,
    candidates: &[(String, NormalizedText)],
    options: &RankingOptions,
) -> Result<RankedResult, RankError> {
    if reference.is_empty() {
        if options.reject_empty_reference {
            return Err(RankError::EmptyReference);
        }
        warn!("reference document is empty; every candidate will score 0");
    }

    let entries: Vec<ScoreEntry> = match options.vocabulary_mode {
        VocabularyMode::Pairwise => candidates
            .iter()
            .map(|(id, text)| ScoreEntry::new(id.clone(), score_pair(reference, text)))
            .collect(),
        VocabularyMode::Corpus => {
            let corpus: Vec<&NormalizedText> = std::iter::once(reference)
                .chain(candidates.iter().map(|(_, text)| text))
                .collect();
            let model = TfIdfModel::fit(&corpus);
            debug!(vocabulary = model.vocabulary_len(), "corpus vocabulary fitted");
            candidates
                .iter()
                .map(|(id, text)| {
                    ScoreEntry::new(id.clone(), score_with_model(&model, reference, text))
                })
                .collect()
        }
    };

    for entry in &entries {
        debug!(candidate = %entry.id, score = entry.score, "candidate scored");
    }

    Ok(rank(entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Treats the bytes as UTF-8 text with form feeds between pages.
    struct PlainTextExtractor;

    impl TextExtractor for PlainTextExtractor {
        fn extract(&self, bytes: &[u8]) -> Result<String, RankError> {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| RankError::Extraction(e.to_string()))?;
            Ok(text.split('\u{000C}').collect::<Vec<_>>().join("\n"))
        }
    }

    fn norm(text: &str) -> NormalizedText {
        Normalizer::new().normalize(text)
    }

    fn candidates(items: &[(&str, &str)]) -> Vec<(String, NormalizedText)> {
        items
            .iter()
            .map(|&(id, text)| (id.to_string(), norm(text)))
            .collect()
    }

    #[test]
    fn test_python_engineer_scenario() {
        let reference = norm("Software engineer with Python experience");
        let ranked = rank_candidates(
            &reference,
            &candidates(&[
                ("B", "Marketing specialist with social media skills"),
                ("A", "Experienced Python developer"),
            ]),
            &RankingOptions::default(),
        )
        .unwrap();

        assert_eq!(ranked.ids(), vec!["A", "B"]);
        let entries = ranked.entries();
        assert!(entries[0].score > entries[1].score);
        assert!(entries[1].score >= 0.0);
    }

    #[test]
    fn test_identical_candidates_score_100_and_keep_order() {
        let text = "Rust engineer, async networking";
        let reference = norm(text);
        let ranked = rank_candidates(
            &reference,
            &candidates(&[("other", "gardening"), ("first", text), ("second", text)]),
            &RankingOptions::default(),
        )
        .unwrap();

        assert_eq!(ranked.ids(), vec!["first", "second", "other"]);
        for entry in &ranked.entries()[..2] {
            assert!((entry.score - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_reference_scores_zero_by_default() {
        let ranked = rank_candidates(
            &norm(""),
            &candidates(&[("x", "anything")]),
            &RankingOptions::default(),
        )
        .unwrap();
        assert_eq!(ranked.entries(), &[ScoreEntry::new("x", 0.0)]);
    }

    #[test]
    fn test_empty_reference_rejected_when_configured() {
        let options = RankingOptions {
            reject_empty_reference: true,
            ..RankingOptions::default()
        };
        let result = rank_candidates(&norm(" ... "), &candidates(&[("x", "anything")]), &options);
        assert_eq!(result, Err(RankError::EmptyReference));
    }

    #[test]
    fn test_no_candidates_is_empty_result() {
        let ranked =
            rank_candidates(&norm("rust"), &[], &RankingOptions::default()).unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_corpus_mode_ranks_and_bounds_scores() {
        let options = RankingOptions {
            vocabulary_mode: VocabularyMode::Corpus,
            ..RankingOptions::default()
        };
        let reference = norm("Software engineer with Python experience");
        let ranked = rank_candidates(
            &reference,
            &candidates(&[
                ("B", "Marketing specialist with social media skills"),
                ("A", "Experienced Python developer"),
                ("C", "Software engineer with Python experience"),
            ]),
            &options,
        )
        .unwrap();

        assert_eq!(ranked.ids(), vec!["C", "A", "B"]);
        assert!((ranked.entries()[0].score - 100.0).abs() < 1e-9);
        assert!(ranked.entries().iter().all(|e| (0.0..=100.0).contains(&e.score)));
    }

    #[test]
    fn test_pairwise_score_independent_of_other_candidates() {
        let reference = norm("backend engineer rust postgres");
        let alone = rank_candidates(
            &reference,
            &candidates(&[("a", "rust engineer")]),
            &RankingOptions::default(),
        )
        .unwrap();
        let crowded = rank_candidates(
            &reference,
            &candidates(&[("a", "rust engineer"), ("b", "rust rust rust"), ("c", "postgres")]),
            &RankingOptions::default(),
        )
        .unwrap();

        let score_alone = alone.entries()[0].score;
        let score_crowded = crowded
            .entries()
            .iter()
            .find(|e| e.id == "a")
            .map(|e| e.score)
            .unwrap();
        assert_eq!(score_alone, score_crowded);
    }

    #[test]
    fn test_extract_and_normalize_joins_pages() {
        let normalized = extract_and_normalize(
            &PlainTextExtractor,
            &Normalizer::new(),
            "Page ONE.\u{000C}Page two!".as_bytes(),
        )
        .unwrap();
        assert_eq!(normalized.as_str(), "page one page two");
    }

    #[test]
    fn test_extract_and_normalize_propagates_extraction_error() {
        let result = extract_and_normalize(&PlainTextExtractor, &Normalizer::new(), &[0xff, 0xfe]);
        assert!(matches!(result, Err(RankError::Extraction(_))));
    }

    #[test]
    fn test_load_document_keeps_raw_text() {
        let doc = load_document(
            "cv.pdf",
            b"Senior SRE, Kubernetes.",
            &PlainTextExtractor,
            &Normalizer::new(),
        )
        .unwrap();
        assert_eq!(doc.id, "cv.pdf");
        assert_eq!(doc.raw_text, "Senior SRE, Kubernetes.");
        assert_eq!(doc.normalized.as_str(), "senior sre kubernetes");
    }
}
