//! Per-request upload staging.
//!
//! Each ranking request owns one `TempDir`; it is deleted when the
//! `RequestScratch` is dropped, on success and on error alike. Nothing is
//! shared between concurrent requests.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;
use uuid::Uuid;

pub struct RequestScratch {
    dir: TempDir,
    used_names: HashSet<String>,
}

impl RequestScratch {
    pub fn new(request_id: Uuid) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(&format!("rank-{request_id}-"))
            .tempdir()
            .context("failed to create request scratch directory")?;
        Ok(Self {
            dir,
            used_names: HashSet::new(),
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `bytes` under a sanitized, request-unique version of `file_name`.
    pub fn store(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let name = self.unique_name(&sanitize_file_name(file_name));
        let path = self.dir.path().join(&name);
        std::fs::write(&path, bytes)
            .with_context(|| format!("failed to stage upload '{name}'"))?;
        Ok(path)
    }

    pub fn read(&self, path: &Path) -> Result<Vec<u8>> {
        std::fs::read(path).with_context(|| format!("failed to read staged upload {path:?}"))
    }

    fn unique_name(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut n = 1;
        while !self.used_names.insert(candidate.clone()) {
            candidate = match base.rsplit_once('.') {
                Some((stem, ext)) if !stem.is_empty() => format!("{stem}-{n}.{ext}"),
                _ => format!("{base}-{n}"),
            };
            n += 1;
        }
        candidate
    }
}

/// Keeps the last path component and only `[A-Za-z0-9._-]`.
pub fn sanitize_file_name(file_name: &str) -> String {
    let last = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
