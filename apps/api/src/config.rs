use anyhow::{Context, Result};

use crate::ranking::models::{RankingOptions, VocabularyMode};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub max_upload_mb: usize,
    pub vocabulary_mode: VocabularyMode,
    pub reject_empty_reference: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            max_upload_mb: env_or("MAX_UPLOAD_MB", "32")
                .parse::<usize>()
                .context("MAX_UPLOAD_MB must be a positive integer")?,
            vocabulary_mode: env_or("VOCABULARY_MODE", "pairwise")
                .parse::<VocabularyMode>()
                .map_err(anyhow::Error::msg)
                .context("VOCABULARY_MODE must be 'pairwise' or 'corpus'")?,
            reject_empty_reference: parse_flag(&env_or("REJECT_EMPTY_REFERENCE", "false"))
                .context("REJECT_EMPTY_REFERENCE must be true or false")?,
        })
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }

    pub fn ranking_options(&self) -> RankingOptions {
        RankingOptions {
            vocabulary_mode: self.vocabulary_mode,
            reject_empty_reference: self.reject_empty_reference,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            max_upload_mb: 32,
            vocabulary_mode: VocabularyMode::Pairwise,
            reject_empty_reference: false,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("unrecognised flag value '{other}'"),
    }
}
