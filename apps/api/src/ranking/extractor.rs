//! Text extraction — PDF bytes in, page texts joined by `\n` out.
//!
//! Primary path is `pdf-extract`, which handles font encodings well but
//! rejects (or panics on) some malformed files as a whole. When it does, the
//! document is re-read with `lopdf` and each page is decoded on its own, so a
//! single undecodable page degrades to an empty segment instead of failing
//! the document.

use std::panic;

use tracing::{debug, warn};

use crate::errors::RankError;

/// Pluggable extraction backend, carried in `AppState` as `Arc<dyn TextExtractor>`.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, RankError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, RankError> {
        extract_with_fallback(bytes, extract_with_pdf_extract)
    }
}

fn extract_with_fallback(
    bytes: &[u8],
    primary: impl FnOnce(&[u8]) -> Result<Vec<String>, String>,
) -> Result<String, RankError> {
    match primary(bytes) {
        Ok(pages) => {
            debug!(pages = pages.len(), "pdf-extract succeeded");
            join_pages(pages)
        }
        Err(reason) => {
            warn!(%reason, "pdf-extract failed, falling back to per-page lopdf decoding");
            join_pages(extract_with_lopdf(bytes)?)
        }
    }
}

/// Runs a decoder, turning a panic inside it into an error string.
fn unwind_guarded<T>(
    decode: impl FnOnce() -> Result<T, String> + panic::UnwindSafe,
) -> Result<T, String> {
    panic::catch_unwind(decode).unwrap_or_else(|_| Err("decoder panicked".to_string()))
}

fn extract_with_pdf_extract(bytes: &[u8]) -> Result<Vec<String>, String> {
    unwind_guarded(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| e.to_string())
    })
}

fn extract_with_lopdf(bytes: &[u8]) -> Result<Vec<String>, RankError> {
    unwind_guarded(|| read_pages_with_lopdf(bytes)).map_err(RankError::Extraction)
}

fn read_pages_with_lopdf(bytes: &[u8]) -> Result<Vec<String>, String> {
    let doc =
        lopdf::Document::load_mem(bytes).map_err(|e| format!("not a readable PDF: {e}"))?;

    let pages = doc.get_pages();
    let texts = pages
        .keys()
        .map(|&page_number| match doc.extract_text(&[page_number]) {
            Ok(text) => text,
            Err(e) => {
                warn!(page = page_number, error = %e, "page text layer unreadable, using empty segment");
                String::new()
            }
        })
        .collect();
    Ok(texts)
}

/// Joins page texts with a single line break. Zero pages is an error.
fn join_pages(pages: Vec<String>) -> Result<String, RankError> {
    if pages.is_empty() {
        return Err(RankError::Extraction("document has no pages".to_string()));
    }
    let trimmed: Vec<&str> = pages
        .iter()
        .map(|page| page.trim_end_matches(['\n', '\r']))
        .collect();
    Ok(trimmed.join("\n"))
}
