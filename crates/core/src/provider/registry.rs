//! Lazily-initialized, ordered provider set.

use std::future::Future;
use std::sync::Arc;

use futures::future::{try_join_all, BoxFuture};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::config::ProviderConfig;

use super::{build_providers, Provider, ProviderError};

type ProviderLoader =
    Box<dyn Fn() -> BoxFuture<'static, Result<Vec<Arc<dyn Provider>>, ProviderError>> + Send + Sync>;

/// Liveness of a single registered provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatusReport {
    pub provider_name: String,
    pub online: bool,
}

/// Holds the provider set for the lifetime of the process.
///
/// The set is resolved on first use. Concurrent first callers wait on the
/// same initialization and all observe the same providers. A failed
/// initialization is not cached; the next caller retries it.
pub struct ProviderRegistry {
    loader: ProviderLoader,
    providers: OnceCell<Vec<Arc<dyn Provider>>>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("initialized", &self.providers.initialized())
            .finish()
    }
}

impl ProviderRegistry {
    /// Create a registry whose providers are produced by an async loader.
    pub fn new<F, Fut>(loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<Arc<dyn Provider>>, ProviderError>> + Send + 'static,
    {
        Self {
            loader: Box::new(move || loader().boxed()),
            providers: OnceCell::new(),
        }
    }

    /// Create a registry from an already-built provider list.
    pub fn from_providers(providers: Vec<Arc<dyn Provider>>) -> Self {
        Self {
            loader: Box::new(|| async { Ok(Vec::new()) }.boxed()),
            providers: OnceCell::new_with(Some(providers)),
        }
    }

    /// Create a registry that builds the enabled configured providers on first use.
    pub fn from_config(configs: Vec<ProviderConfig>) -> Self {
        let configs = Arc::new(configs);
        Self::new(move || {
            let configs = Arc::clone(&configs);
            async move { build_providers(&configs) }
        })
    }

    /// Whether the provider set has been resolved.
    pub fn is_initialized(&self) -> bool {
        self.providers.initialized()
    }

    /// Resolve and return the ordered provider set.
    pub async fn all_providers(&self) -> Result<&[Arc<dyn Provider>], ProviderError> {
        let providers = self
            .providers
            .get_or_try_init(|| async {
                let providers = (self.loader)().await?;
                info!(
                    providers = ?providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
                    "Provider registry initialized"
                );
                Ok::<_, ProviderError>(providers)
            })
            .await?;
        Ok(providers.as_slice())
    }

    /// Query every provider's liveness concurrently, in registration order.
    ///
    /// The first liveness check that errors fails the whole call.
    pub async fn statuses(&self) -> Result<Vec<ProviderStatusReport>, ProviderError> {
        let providers = self.all_providers().await?;
        let checks = providers.iter().map(|provider| provider.status());
        let online = try_join_all(checks).await?;

        debug!(providers = providers.len(), "Provider statuses collected");

        Ok(providers
            .iter()
            .zip(online)
            .map(|(provider, online)| ProviderStatusReport {
                provider_name: provider.name().to_string(),
                online,
            })
            .collect())
    }
}
