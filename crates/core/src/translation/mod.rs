//! Identifier translation.
//!
//! Providers are keyed by IMDB ids (`tt` followed by digits). Callers may
//! hold TMDB numeric ids instead; those are translated before fan-out.

mod tmdb;

pub use tmdb::TmdbTranslator;

use async_trait::async_trait;
use thiserror::Error;

use crate::torrent::ContentKind;

/// Errors that can occur while translating an identifier.
#[derive(Debug, Error)]
pub enum TranslationError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Resource not found (404), or no IMDB id on record.
    #[error("No provider identifier for: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Translator not configured (missing API key, etc.).
    #[error("Translator not configured: {0}")]
    NotConfigured(String),
}

/// Converts external ids into provider-native ids.
#[async_trait]
pub trait IdTranslator: Send + Sync {
    /// Translator name for logging.
    fn name(&self) -> &str;

    async fn translate(
        &self,
        external_id: &str,
        kind: ContentKind,
    ) -> Result<String, TranslationError>;
}

/// Whether `id` is already a provider-native (IMDB) identifier.
pub fn is_native_id(id: &str) -> bool {
    id.strip_prefix("tt")
        .map(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}
