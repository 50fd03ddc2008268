use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical token stream: lowercase tokens joined by single spaces.
///
/// Only the normalizer constructs non-empty values, so `tokens()` can split on
/// plain ASCII whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub(crate) fn from_tokens<'a>(tokens: impl Iterator<Item = &'a str>) -> Self {
        let mut joined = String::new();
        for token in tokens {
            if !joined.is_empty() {
                joined.push(' ');
            }
            joined.push_str(token);
        }
        Self(joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split_ascii_whitespace()
    }

    pub fn token_count(&self) -> usize {
        self.tokens().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An uploaded document after extraction and normalization.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub raw_text: String,
    pub normalized: NormalizedText,
}

/// A candidate's similarity to the reference, 0.0 – 100.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub id: String,
    pub score: f64,
}

impl ScoreEntry {
    pub fn new(id: impl Into<String>, score: f64) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }

    /// Two-decimal rendering used for display.
    pub fn display_score(&self) -> String {
        format!("{:.2}", self.score)
    }
}

/// Score entries ordered by descending score; ties keep input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RankedResult(pub(crate) Vec<ScoreEntry>);

impl RankedResult {
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn ids(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.id.as_str()).collect()
    }
}

impl IntoIterator for RankedResult {
    type Item = ScoreEntry;
    type IntoIter = std::vec::IntoIter<ScoreEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A candidate dropped from the ranking because it could not be read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcludedCandidate {
    pub id: String,
    pub reason: String,
}

/// Which documents contribute to the TF-IDF vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabularyMode {
    /// Fresh vocabulary per (reference, candidate) pair.
    #[default]
    Pairwise,
    /// One vocabulary over the reference and every candidate of the request.
    Corpus,
}

impl VocabularyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            VocabularyMode::Pairwise => "pairwise",
            VocabularyMode::Corpus => "corpus",
        }
    }
}

impl FromStr for VocabularyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pairwise" | "pair" => Ok(VocabularyMode::Pairwise),
            "corpus" | "shared" => Ok(VocabularyMode::Corpus),
            other => Err(format!("unknown vocabulary mode '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankingOptions {
    pub vocabulary_mode: VocabularyMode,
    /// Fail with `RankError::EmptyReference` instead of scoring everyone 0.
    pub reject_empty_reference: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tokens_joins_with_single_space() {
        let text = NormalizedText::from_tokens(["rust", "engineer"].into_iter());
        assert_eq!(text.as_str(), "rust engineer");
        assert_eq!(text.token_count(), 2);
    }

    #[test]
    fn test_from_no_tokens_is_empty() {
        let text = NormalizedText::from_tokens(std::iter::empty());
        assert!(text.is_empty());
        assert_eq!(text.tokens().count(), 0);
    }

    #[test]
    fn test_display_score_two_decimals() {
        assert_eq!(ScoreEntry::new("a.pdf", 15.0563).display_score(), "15.06");
        assert_eq!(ScoreEntry::new("b.pdf", 0.0).display_score(), "0.00");
    }

    #[test]
    fn test_vocabulary_mode_parse() {
        assert_eq!("Pairwise".parse::<VocabularyMode>(), Ok(VocabularyMode::Pairwise));
        assert_eq!(" corpus ".parse::<VocabularyMode>(), Ok(VocabularyMode::Corpus));
        assert!("global".parse::<VocabularyMode>().is_err());
    }

    #[test]
    fn test_vocabulary_mode_serde_snake_case() {
        let json = serde_json::to_string(&VocabularyMode::Corpus).unwrap();
        assert_eq!(json, r#""corpus""#);
    }
}
