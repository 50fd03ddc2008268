//! Normalizer — turns raw extracted text into a canonical lowercase token stream.
//!
//! Segmentation follows Unicode word boundaries (UAX #29), so "Python," splits
//! into "Python" and "," while "don't" and "3.5" stay whole. Whitespace is
//! removed from every segment, since a combining mark after a space joins the
//! space's segment; what is left is dropped if empty or only punctuation.

use unicode_segmentation::UnicodeSegmentation;

use crate::ranking::models::NormalizedText;

/// Stateless, immutable after construction, and shared across requests via `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, text: &str) -> NormalizedText {
        let lowered: Vec<String> = text
            .split_word_bounds()
            .filter_map(content_token)
            .map(|token| token.to_lowercase())
            .collect();
        NormalizedText::from_tokens(lowered.iter().map(String::as_str))
    }
}

fn content_token(segment: &str) -> Option<String> {
    let token: String = segment.chars().filter(|c| !c.is_whitespace()).collect();
    if token.is_empty() || token.chars().all(is_punctuation) {
        None
    } else {
        Some(token)
    }
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '\u{00A1}'
                | '\u{00A7}'
                | '\u{00AB}'
                | '\u{00B6}'
                | '\u{00B7}'
                | '\u{00BB}'
                | '\u{00BF}'
                | '\u{2010}'..='\u{2027}'
                | '\u{2030}'..='\u{205E}'
                | '\u{3001}'..='\u{3003}'
                | '\u{3008}'..='\u{3011}'
                | '\u{FF01}'..='\u{FF0F}'
        )
}
