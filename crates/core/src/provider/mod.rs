//! Torrent provider abstraction.
//!
//! Each provider answers `(id, kind)` queries with raw results and reports
//! its own liveness. The registry holds the fixed, ordered provider set.

mod popcorn;
mod registry;
mod yts;

pub use popcorn::PopcornProvider;
pub use registry::{ProviderRegistry, ProviderStatusReport};
pub use yts::YtsProvider;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{ProviderConfig, ProviderKind};
use crate::torrent::{ContentKind, RawResult};

/// Errors that can occur when querying a provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Provider API error: {0}")]
    ApiError(String),

    #[error("Failed to parse provider response: {0}")]
    ParseError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Provider setup failed: {0}")]
    Setup(String),

    #[error("Provider task did not complete: {0}")]
    TaskFailed(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout
        } else if e.is_connect() {
            ProviderError::ConnectionFailed(e.to_string())
        } else if e.is_decode() {
            ProviderError::ParseError(e.to_string())
        } else {
            ProviderError::ApiError(e.to_string())
        }
    }
}

/// A source of raw torrent results.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Static provider identity, used in statuses and logs.
    fn name(&self) -> &str;

    /// Query the provider for a provider-native identifier.
    async fn provide(&self, id: &str, kind: ContentKind) -> Result<Vec<RawResult>, ProviderError>;

    /// Whether the provider is currently reachable.
    async fn status(&self) -> Result<bool, ProviderError>;
}

/// Build the client for one configured provider.
pub fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let provider: Arc<dyn Provider> = match config.kind {
        ProviderKind::Yts => Arc::new(YtsProvider::new(config)?),
        ProviderKind::Popcorn => Arc::new(PopcornProvider::new(config)?),
    };
    Ok(provider)
}

/// Build every enabled provider, preserving configuration order.
pub fn build_providers(configs: &[ProviderConfig]) -> Result<Vec<Arc<dyn Provider>>, ProviderError> {
    configs
        .iter()
        .filter(|c| c.enabled)
        .map(build_provider)
        .collect()
}
