//! Axum route handlers for the Ranking API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::ranking::extractor::TextExtractor;
use crate::ranking::models::{ExcludedCandidate, RankedResult, RankingOptions, VocabularyMode};
use crate::ranking::normalizer::Normalizer;
use crate::ranking::pipeline::{extract_and_normalize, load_document, rank_candidates};
use crate::ranking::scratch::RequestScratch;
use crate::state::AppState;

pub const JOB_DESCRIPTION_FIELD: &str = "job_description";
pub const RESUMES_FIELD: &str = "resumes";

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub id: String,
    pub score: f64,
    pub display_score: String,
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub request_id: Uuid,
    pub vocabulary_mode: VocabularyMode,
    pub results: Vec<RankedEntry>,
    pub excluded: Vec<ExcludedCandidate>,
}

/// An upload written to the request's scratch directory.
#[derive(Debug)]
struct StagedUpload {
    id: String,
    path: std::path::PathBuf,
}

struct RankOutcome {
    ranked: RankedResult,
    excluded: Vec<ExcludedCandidate>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/rank
///
/// Multipart form: one `job_description` file and any number of `resumes`
/// files. Returns the resumes ordered by similarity to the job description.
/// Resumes that cannot be read are listed under `excluded`; an unreadable job
/// description fails the whole request.
pub async fn handle_rank(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<RankResponse>, AppError> {
    let request_id = Uuid::new_v4();
    let mut scratch = RequestScratch::new(request_id)?;

    let mut reference: Option<StagedUpload> = None;
    let mut candidates: Vec<StagedUpload> = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        if field_name != JOB_DESCRIPTION_FIELD && field_name != RESUMES_FIELD {
            debug!(field = %field_name, "ignoring unknown multipart field");
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.is_empty());
        let data = field.bytes().await?;

        // Browsers send an empty part when no file was chosen.
        if file_name.is_none() && data.is_empty() {
            continue;
        }

        if field_name == JOB_DESCRIPTION_FIELD {
            if reference.is_some() {
                return Err(AppError::Validation(
                    "Upload exactly one job description".to_string(),
                ));
            }
            let id = file_name.unwrap_or_else(|| "job_description".to_string());
            let path = scratch.store(&id, &data)?;
            reference = Some(StagedUpload { id, path });
        } else {
            let id = file_name.unwrap_or_else(|| format!("resume-{}", candidates.len() + 1));
            let path = scratch.store(&id, &data)?;
            candidates.push(StagedUpload { id, path });
        }
    }

    let reference = reference.ok_or_else(|| {
        AppError::Validation("Please upload both a job description and resumes".to_string())
    })?;

    info!(
        %request_id,
        reference = %reference.id,
        candidates = candidates.len(),
        scratch = ?scratch.path(),
        "ranking request staged"
    );

    let options = state.config.ranking_options();
    let extractor = state.extractor.clone();
    let normalizer = state.normalizer.clone();

    // CPU-bound: PDF decoding and scoring run off the async runtime.
    let outcome = tokio::task::spawn_blocking(move || {
        let span = info_span!("rank", %request_id);
        let _guard = span.enter();
        rank_staged(
            &scratch,
            &reference,
            &candidates,
            extractor.as_ref(),
            &normalizer,
            &options,
        )
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("ranking task failed: {e}")))??;

    info!(
        %request_id,
        ranked = outcome.ranked.len(),
        excluded = outcome.excluded.len(),
        top = outcome.ranked.entries().first().map(|e| e.id.as_str()).unwrap_or("-"),
        "ranking complete"
    );
    if outcome.ranked.is_empty() && !outcome.excluded.is_empty() {
        warn!(%request_id, "every uploaded resume was excluded");
    }

    let results = outcome
        .ranked
        .into_iter()
        .enumerate()
        .map(|(index, entry)| RankedEntry {
            rank: index + 1,
            display_score: entry.display_score(),
            id: entry.id,
            score: entry.score,
        })
        .collect();

    Ok(Json(RankResponse {
        request_id,
        vocabulary_mode: options.vocabulary_mode,
        results,
        excluded: outcome.excluded,
    }))
}

/// Runs the whole pipeline for one request, sequentially. The scratch
/// directory is dropped (and deleted) by the caller's closure afterwards.
fn rank_staged(
    scratch: &RequestScratch,
    reference: &StagedUpload,
    candidates: &[StagedUpload],
    extractor: &dyn TextExtractor,
    normalizer: &Normalizer,
    options: &RankingOptions,
) -> Result<RankOutcome, AppError> {
    let reference_bytes = scratch.read(&reference.path)?;
    let reference_text = extract_and_normalize(extractor, normalizer, &reference_bytes)?;
    debug!(tokens = reference_text.token_count(), "reference normalized");

    let mut scored = Vec::with_capacity(candidates.len());
    let mut excluded = Vec::new();
    for candidate in candidates {
        let bytes = scratch.read(&candidate.path)?;
        match load_document(&candidate.id, &bytes, extractor, normalizer) {
            Ok(doc) => {
                debug!(
                    candidate = %doc.id,
                    chars = doc.raw_text.chars().count(),
                    tokens = doc.normalized.token_count(),
                    "resume loaded"
                );
                scored.push((doc.id, doc.normalized));
            }
            Err(e) => {
                warn!(candidate = %candidate.id, error = %e, "excluding unreadable resume");
                excluded.push(ExcludedCandidate {
                    id: candidate.id.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    let ranked = rank_candidates(&reference_text, &scored, options)?;
    Ok(RankOutcome { ranked, excluded })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
