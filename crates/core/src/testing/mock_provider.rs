//! Mock provider for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::provider::{Provider, ProviderError};
use crate::torrent::{ContentKind, RawResult};

/// A recorded `provide` call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedQuery {
    pub id: String,
    pub kind: ContentKind,
    /// When the call was made.
    pub timestamp: Instant,
}

/// Mock implementation of the Provider trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable raw results
/// - Track queries for assertions
/// - Simulate failures, latency and offline status
///
/// # Example
///
/// ```rust,ignore
/// use aggregator_core::testing::{fixtures, MockProvider};
///
/// let provider = MockProvider::new("yts").with_delay(Duration::from_millis(50));
/// provider.set_results(vec![fixtures::raw_result("yts", "Movie 1080p", "aaa", 40)]).await;
///
/// let results = provider.provide("tt0111161", ContentKind::Movies).await?;
/// assert_eq!(results.len(), 1);
/// assert_eq!(provider.call_count().await, 1);
/// ```
pub struct MockProvider {
    name: String,
    /// Simulated latency of every call.
    delay: Option<Duration>,
    /// Configured results to return.
    results: Arc<RwLock<Vec<RawResult>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedQuery>>>,
    /// If set, every `provide` call fails with this message.
    failure: Arc<RwLock<Option<String>>>,
    /// If set, the next `status` call fails with this error.
    status_error: Arc<RwLock<Option<ProviderError>>>,
    online: Arc<RwLock<bool>>,
}

impl std::fmt::Debug for MockProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockProvider")
            .field("name", &self.name)
            .field("delay", &self.delay)
            .finish()
    }
}

impl MockProvider {
    /// Create an online mock provider with no results.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            delay: None,
            results: Arc::new(RwLock::new(Vec::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            failure: Arc::new(RwLock::new(None)),
            status_error: Arc::new(RwLock::new(None)),
            online: Arc::new(RwLock::new(true)),
        }
    }

    /// Delay every `provide` and `status` call by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the results to return for subsequent calls.
    pub async fn set_results(&self, results: Vec<RawResult>) {
        *self.results.write().await = results;
    }

    /// Make every subsequent `provide` call fail with an API error.
    pub async fn set_failure(&self, message: &str) {
        *self.failure.write().await = Some(message.to_string());
    }

    /// Clear any configured failure.
    pub async fn clear_failure(&self) {
        *self.failure.write().await = None;
    }

    pub async fn set_online(&self, online: bool) {
        *self.online.write().await = online;
    }

    /// Configure the next `status` call to fail with the given error.
    pub async fn set_status_error(&self, error: ProviderError) {
        *self.status_error.write().await = Some(error);
    }

    /// Get recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedQuery> {
        self.queries.read().await.clone()
    }

    /// Get the number of `provide` calls made.
    pub async fn call_count(&self) -> usize {
        self.queries.read().await.len()
    }

    async fn simulate_latency(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn provide(&self, id: &str, kind: ContentKind) -> Result<Vec<RawResult>, ProviderError> {
        self.queries.write().await.push(RecordedQuery {
            id: id.to_string(),
            kind,
            timestamp: Instant::now(),
        });

        self.simulate_latency().await;

        if let Some(message) = self.failure.read().await.clone() {
            return Err(ProviderError::ApiError(message));
        }

        Ok(self.results.read().await.clone())
    }

    async fn status(&self) -> Result<bool, ProviderError> {
        self.simulate_latency().await;

        if let Some(error) = self.status_error.write().await.take() {
            return Err(error);
        }

        Ok(*self.online.read().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_records_queries_and_returns_results() {
        let provider = MockProvider::new("mock");
        provider
            .set_results(vec![fixtures::raw_result("mock", "Movie 1080p", "aaa", 10)])
            .await;

        let results = provider.provide("tt1", ContentKind::Movies).await.unwrap();
        assert_eq!(results.len(), 1);

        let queries = provider.recorded_queries().await;
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].id, "tt1");
        assert_eq!(queries[0].kind, ContentKind::Movies);
    }

    #[tokio::test]
    async fn test_failure_persists_until_cleared() {
        let provider = MockProvider::new("mock");
        provider.set_failure("boom").await;

        assert!(provider.provide("tt1", ContentKind::Movies).await.is_err());
        assert!(provider.provide("tt1", ContentKind::Movies).await.is_err());

        provider.clear_failure().await;
        assert!(provider.provide("tt1", ContentKind::Movies).await.is_ok());
        assert_eq!(provider.call_count().await, 3);
    }

    #[tokio::test]
    async fn test_status_error_is_one_shot() {
        let provider = MockProvider::new("mock");
        provider.set_status_error(ProviderError::Timeout).await;

        assert!(matches!(provider.status().await, Err(ProviderError::Timeout)));
        assert!(provider.status().await.unwrap());
    }
}
