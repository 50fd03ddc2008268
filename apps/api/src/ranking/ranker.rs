//! Orders score entries by descending score.
//!
//! `sort_by` is stable, so equal scores keep their upload order. `total_cmp`
//! gives a total order even if a NaN ever slips through (it sorts first).

use crate::ranking::models::{RankedResult, ScoreEntry};

pub fn rank(mut entries: Vec<ScoreEntry>) -> RankedResult {
    entries.sort_by(|a, b| b.score.total_cmp(&a.score));
    RankedResult(entries)
}
