//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Provider fan-out (requests, durations)
//! - Query cache (hits, misses, bypasses)
//! - Resolve outcomes and selection fill

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Providers
// =============================================================================

/// Provider calls by provider and result.
pub static PROVIDER_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "aggregator_provider_requests_total",
            "Total provider calls",
        ),
        &["provider", "result"], // "success", "failure"
    )
    .unwrap()
});

/// Provider call duration in seconds.
pub static PROVIDER_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "aggregator_provider_duration_seconds",
            "Duration of provider calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["provider"],
    )
    .unwrap()
});

/// Raw results returned per provider call.
pub static PROVIDER_RESULTS: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "aggregator_provider_results",
            "Number of raw results per provider call",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0]),
        &["provider"],
    )
    .unwrap()
});

// =============================================================================
// Cache
// =============================================================================

/// Cache lookups by outcome.
pub static CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("aggregator_cache_lookups_total", "Query cache lookups"),
        &["outcome"], // "hit", "miss", "bypass"
    )
    .unwrap()
});

// =============================================================================
// Resolve
// =============================================================================

/// Resolve calls by join policy and result.
pub static RESOLVE_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("aggregator_resolve_total", "Total resolve calls"),
        &["method", "result"], // "cached", "selected", "raw", "failed"
    )
    .unwrap()
});

/// End-to-end resolve duration in seconds.
pub static RESOLVE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "aggregator_resolve_duration_seconds",
            "Duration of resolve calls",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["method"],
    )
    .unwrap()
});

/// Filled selection slots by tier.
pub static SELECTION_TIERS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "aggregator_selection_tiers_total",
            "Selection slots filled per quality tier",
        ),
        &["tier"],
    )
    .unwrap()
});

/// Identifier translations by result.
pub static TRANSLATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "aggregator_translations_total",
            "Identifier translations performed",
        ),
        &["result"], // "success", "failure"
    )
    .unwrap()
});

/// Returns all core metrics for registration with a Prometheus registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(PROVIDER_REQUESTS.clone()),
        Box::new(PROVIDER_DURATION.clone()),
        Box::new(PROVIDER_RESULTS.clone()),
        Box::new(CACHE_LOOKUPS.clone()),
        Box::new(RESOLVE_TOTAL.clone()),
        Box::new(RESOLVE_DURATION.clone()),
        Box::new(SELECTION_TIERS.clone()),
        Box::new(TRANSLATIONS_TOTAL.clone()),
    ]
}
