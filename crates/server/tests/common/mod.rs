//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock providers injected, enabling E2E testing without network
//! access.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use aggregator_core::{
    config::{LoggingConfig, ServerConfig},
    testing::{MockProvider, MockTranslator},
    Aggregator, CacheConfig, Config, IdTranslator, Provider, ProviderConfig, ProviderKind,
    ProviderRegistry, QualityConfig, QueryCache, TranslationConfig,
};
use aggregator_server::state::AppState;

/// Re-export fixtures for test convenience
pub use aggregator_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// Provides an in-process server with two mock providers registered in
/// order (`yts`, then `popcorn`) and a mock identifier translator.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_resolve() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture.post("/api/v1/resolve", json!({
///         "id": "tt0111161",
///         "kind": "movies"
///     })).await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// First registered provider
    pub yts: Arc<MockProvider>,
    /// Second registered provider
    pub popcorn: Arc<MockProvider>,
    /// Mock identifier translator
    pub translator: Arc<MockTranslator>,
    /// Shared with the aggregator behind the router
    pub cache: QueryCache,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        Self::with_providers(MockProvider::new("yts"), MockProvider::new("popcorn")).await
    }

    /// Create a test fixture around the given providers.
    pub async fn with_providers(yts: MockProvider, popcorn: MockProvider) -> Self {
        let yts = Arc::new(yts);
        let popcorn = Arc::new(popcorn);
        let translator = Arc::new(MockTranslator::new());
        let cache = QueryCache::new();

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            logging: LoggingConfig::default(),
            providers: vec![
                provider_config("yts", ProviderKind::Yts),
                provider_config("popcorn", ProviderKind::Popcorn),
            ],
            translation: Some(TranslationConfig {
                api_key: "secret-test-key".to_string(),
                base_url: None,
                timeout_secs: 5,
            }),
            cache: CacheConfig::default(),
            quality: QualityConfig::default(),
        };

        let registry = ProviderRegistry::from_providers(vec![
            Arc::clone(&yts) as Arc<dyn Provider>,
            Arc::clone(&popcorn) as Arc<dyn Provider>,
        ]);
        let aggregator = Aggregator::new(Arc::new(registry), cache.clone())
            .with_translator(Arc::clone(&translator) as Arc<dyn IdTranslator>);

        let state = Arc::new(AppState::new(config, Arc::new(aggregator)));
        let router = aggregator_server::api::create_router(state);

        Self {
            router,
            yts,
            popcorn,
            translator,
            cache,
        }
    }

    /// Total `provide` calls across both providers.
    pub async fn provider_calls(&self) -> usize {
        self.yts.call_count().await + self.popcorn.call_count().await
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }
}

fn provider_config(name: &str, kind: ProviderKind) -> ProviderConfig {
    ProviderConfig {
        name: name.to_string(),
        kind,
        enabled: true,
        base_url: None,
        timeout_secs: 5,
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
