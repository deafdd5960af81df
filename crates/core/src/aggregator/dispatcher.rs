//! Fan-out of a resolve request to the provider set.

use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::cache::{QueryCache, QuerySignature};
use crate::config::CacheConfig;
use crate::metrics;
use crate::provider::{Provider, ProviderError, ProviderRegistry, ProviderStatusReport};
use crate::torrent::{
    deduplicate, select_torrents, ContentFilter, ContentKind, Normalizer, RawResult,
    TorrentSelection,
};
use crate::translation::{is_native_id, IdTranslator, TranslationError};

use super::types::{AggregatorError, ExtendedDetails, JoinPolicy, Resolution, ResolveRequest};

/// Output of one spawned provider call, tagged with its registration index.
type ProviderOutcome = (usize, Result<Vec<RawResult>, ProviderError>);

/// Resolves content identifiers into torrent selections.
///
/// Owns the query cache and shares the provider registry. Cloning the
/// cache handle out of an aggregator observes the same entries.
pub struct Aggregator {
    registry: Arc<ProviderRegistry>,
    translator: Option<Arc<dyn IdTranslator>>,
    cache: QueryCache,
    cache_config: CacheConfig,
    normalizer: Normalizer,
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("registry", &self.registry)
            .field("translator", &self.translator.as_ref().map(|t| t.name().to_string()))
            .field("cache_config", &self.cache_config)
            .finish()
    }
}

impl Aggregator {
    pub fn new(registry: Arc<ProviderRegistry>, cache: QueryCache) -> Self {
        Self {
            registry,
            translator: None,
            cache,
            cache_config: CacheConfig::default(),
            normalizer: Normalizer::default(),
        }
    }

    /// Translate non-native identifiers with `translator` before fan-out.
    pub fn with_translator(mut self, translator: Arc<dyn IdTranslator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_cache_config(mut self, cache_config: CacheConfig) -> Self {
        self.cache_config = cache_config;
        self
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Liveness of every registered provider, in registration order.
    pub async fn statuses(&self) -> Result<Vec<ProviderStatusReport>, ProviderError> {
        self.registry.statuses().await
    }

    /// Resolve a request into a selection (`all`) or raw provider output (`race`).
    pub async fn resolve(&self, request: &ResolveRequest) -> Result<Resolution, AggregatorError> {
        let method = request.method.as_str();
        let timer = metrics::RESOLVE_DURATION
            .with_label_values(&[method])
            .start_timer();

        let result = self.resolve_inner(request).await;
        timer.observe_duration();

        match &result {
            Ok(Resolution::Raw { provider, results }) => {
                metrics::RESOLVE_TOTAL.with_label_values(&[method, "raw"]).inc();
                info!(
                    id = %request.id,
                    kind = %request.kind,
                    provider = %provider,
                    results = results.len(),
                    "Race resolved"
                );
            }
            Ok(Resolution::Selection { torrents }) => {
                info!(
                    id = %request.id,
                    kind = %request.kind,
                    tiers = torrents.len(),
                    "Selection resolved"
                );
            }
            Err(e) => {
                metrics::RESOLVE_TOTAL
                    .with_label_values(&[method, "failed"])
                    .inc();
                warn!(id = %request.id, kind = %request.kind, error = %e, "Resolve failed");
            }
        }

        result
    }

    async fn resolve_inner(&self, request: &ResolveRequest) -> Result<Resolution, AggregatorError> {
        // Race output is returned unfiltered, so only `all` needs episode coordinates.
        let filter = match request.method {
            JoinPolicy::All => content_filter(request.kind, &request.details)?,
            JoinPolicy::Race => ContentFilter::PassThrough,
        };
        let signature = QuerySignature::for_scope(
            self.cache_config.key_scope,
            &request.details,
            request.return_all,
            request.method,
            &request.id,
            request.kind,
        );

        if let Some(selection) = self.cached(request, &signature).await {
            metrics::RESOLVE_TOTAL
                .with_label_values(&[request.method.as_str(), "cached"])
                .inc();
            return Ok(Resolution::Selection {
                torrents: selection,
            });
        }

        let id = self.provider_id(request).await?;
        let providers = self
            .registry
            .all_providers()
            .await
            .map_err(AggregatorError::Registry)?;

        debug!(
            id = %id,
            kind = %request.kind,
            method = %request.method,
            providers = providers.len(),
            "Fanning out to providers"
        );

        match request.method {
            JoinPolicy::Race => {
                let (provider, results) = race(providers, &id, request.kind).await?;
                Ok(Resolution::Raw { provider, results })
            }
            JoinPolicy::All => {
                let raw = join_all(providers, &id, request.kind).await?;
                let selection = self.select(raw, request.kind, filter);
                metrics::RESOLVE_TOTAL
                    .with_label_values(&[request.method.as_str(), "selected"])
                    .inc();

                self.cache.put(signature, selection.clone()).await;
                Ok(Resolution::Selection {
                    torrents: selection,
                })
            }
        }
    }

    /// Cache read, honoring both the per-request flag and the global switch.
    /// Neither affects the write that follows a computed selection.
    async fn cached(
        &self,
        request: &ResolveRequest,
        signature: &QuerySignature,
    ) -> Option<TorrentSelection> {
        if !(request.use_cache && self.cache_config.enabled) {
            metrics::CACHE_LOOKUPS.with_label_values(&["bypass"]).inc();
            return None;
        }

        let hit = self.cache.get(signature).await;
        let outcome = if hit.is_some() { "hit" } else { "miss" };
        metrics::CACHE_LOOKUPS.with_label_values(&[outcome]).inc();
        debug!(signature = %signature, outcome = outcome, "Cache lookup");
        hit
    }

    /// The identifier providers understand, translating it if needed.
    async fn provider_id(&self, request: &ResolveRequest) -> Result<String, AggregatorError> {
        if is_native_id(&request.id) {
            return Ok(request.id.clone());
        }

        let translator = self.translator.as_ref().ok_or_else(|| {
            TranslationError::NotConfigured("no identifier translator available".to_string())
        })?;

        match translator.translate(&request.id, request.kind).await {
            Ok(native) => {
                metrics::TRANSLATIONS_TOTAL
                    .with_label_values(&["success"])
                    .inc();
                debug!(
                    translator = translator.name(),
                    from = %request.id,
                    to = %native,
                    "Identifier translated"
                );
                Ok(native)
            }
            Err(e) => {
                metrics::TRANSLATIONS_TOTAL
                    .with_label_values(&["failure"])
                    .inc();
                Err(e.into())
            }
        }
    }

    /// Normalize, filter, deduplicate and pick one torrent per tier.
    fn select(&self, raw: Vec<RawResult>, kind: ContentKind, filter: ContentFilter) -> TorrentSelection {
        let total = raw.len();
        let normalized = raw
            .into_iter()
            .map(|r| self.normalizer.normalize(r, kind))
            .collect();
        let matching = filter.apply(normalized);
        let matching_count = matching.len();
        let unique = deduplicate(matching);

        debug!(
            raw = total,
            matching = matching_count,
            unique = unique.len(),
            "Candidates filtered"
        );

        let selection = select_torrents(unique);
        for (tier, _) in selection.iter() {
            metrics::SELECTION_TIERS
                .with_label_values(&[tier.as_str()])
                .inc();
        }
        selection
    }
}

/// Filter for the requested kind. Show kinds need their episode coordinates.
fn content_filter(
    kind: ContentKind,
    details: &ExtendedDetails,
) -> Result<ContentFilter, AggregatorError> {
    match kind {
        ContentKind::Movies => Ok(ContentFilter::PassThrough),
        ContentKind::Shows => match (details.season, details.episode) {
            (Some(season), Some(episode)) => Ok(ContentFilter::Episode { season, episode }),
            _ => Err(AggregatorError::MissingDetails(
                "shows require season and episode".to_string(),
            )),
        },
        ContentKind::SeasonComplete => details
            .season
            .map(|season| ContentFilter::CompleteSeason { season })
            .ok_or_else(|| {
                AggregatorError::MissingDetails("season_complete requires season".to_string())
            }),
    }
}

/// Launch one task per provider. Each outcome carries the provider's index.
fn spawn_calls(
    providers: &[Arc<dyn Provider>],
    id: &str,
    kind: ContentKind,
) -> JoinSet<ProviderOutcome> {
    let mut calls = JoinSet::new();
    for (index, provider) in providers.iter().enumerate() {
        let provider = Arc::clone(provider);
        let id = id.to_string();
        calls.spawn(async move {
            let started = Instant::now();
            let result = provider.provide(&id, kind).await;
            record_call(provider.name(), started, &result);
            (index, result)
        });
    }
    calls
}

fn record_call(name: &str, started: Instant, result: &Result<Vec<RawResult>, ProviderError>) {
    metrics::PROVIDER_DURATION
        .with_label_values(&[name])
        .observe(started.elapsed().as_secs_f64());

    match result {
        Ok(results) => {
            metrics::PROVIDER_REQUESTS
                .with_label_values(&[name, "success"])
                .inc();
            metrics::PROVIDER_RESULTS
                .with_label_values(&[name])
                .observe(results.len() as f64);
            debug!(provider = name, results = results.len(), "Provider call complete");
        }
        Err(e) => {
            metrics::PROVIDER_REQUESTS
                .with_label_values(&[name, "failure"])
                .inc();
            warn!(provider = name, error = %e, "Provider call failed");
        }
    }
}

fn task_failure(error: tokio::task::JoinError) -> AggregatorError {
    AggregatorError::ProviderFailure {
        provider: "unknown".to_string(),
        source: ProviderError::TaskFailed(error.to_string()),
    }
}

/// Wait for every provider and concatenate results in registration order.
///
/// The first failure aborts the outstanding calls and fails the join.
async fn join_all(
    providers: &[Arc<dyn Provider>],
    id: &str,
    kind: ContentKind,
) -> Result<Vec<RawResult>, AggregatorError> {
    let mut calls = spawn_calls(providers, id, kind);
    let mut slots: Vec<Option<Vec<RawResult>>> = (0..providers.len()).map(|_| None).collect();

    while let Some(joined) = calls.join_next().await {
        let (index, result) = match joined {
            Ok(outcome) => outcome,
            Err(e) => {
                calls.abort_all();
                return Err(task_failure(e));
            }
        };
        match result {
            Ok(results) => slots[index] = Some(results),
            Err(source) => {
                calls.abort_all();
                return Err(AggregatorError::ProviderFailure {
                    provider: providers[index].name().to_string(),
                    source,
                });
            }
        }
    }

    Ok(slots.into_iter().flatten().flatten().collect())
}

/// Return the output of whichever provider settles first, success or failure.
async fn race(
    providers: &[Arc<dyn Provider>],
    id: &str,
    kind: ContentKind,
) -> Result<(String, Vec<RawResult>), AggregatorError> {
    let mut calls = spawn_calls(providers, id, kind);

    let joined = calls.join_next().await.ok_or(AggregatorError::NoProviders)?;
    calls.abort_all();

    let (index, result) = joined.map_err(task_failure)?;
    let provider = providers[index].name().to_string();
    match result {
        Ok(results) => Ok((provider, results)),
        Err(source) => Err(AggregatorError::ProviderFailure { provider, source }),
    }
}
