//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the provider and
//! translation traits, allowing end-to-end testing of the aggregator
//! without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use aggregator_core::testing::{fixtures, MockProvider, MockTranslator};
//!
//! let yts = MockProvider::new("yts");
//! yts.set_results(vec![fixtures::raw_result("yts", "Movie 1080p", "aaa", 40)]).await;
//!
//! let translator = MockTranslator::new();
//! translator.add_mapping("278", "tt0111161").await;
//! ```

mod mock_provider;
mod mock_translator;

pub use mock_provider::{MockProvider, RecordedQuery};
pub use mock_translator::MockTranslator;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::torrent::RawResult;

    /// Magnet link for a given info hash.
    pub fn magnet(info_hash: &str) -> String {
        format!("magnet:?xt=urn:btih:{}", info_hash)
    }

    /// A raw result whose quality is classified from `metadata`.
    pub fn raw_result(provider: &str, metadata: &str, info_hash: &str, seeders: u32) -> RawResult {
        RawResult {
            provider: provider.to_string(),
            metadata: metadata.to_string(),
            magnet: Some(magnet(info_hash)),
            seeders,
            leechers: 0,
            quality: None,
        }
    }

    /// A raw result carrying a provider-supplied quality label.
    pub fn labeled_result(
        provider: &str,
        metadata: &str,
        info_hash: &str,
        seeders: u32,
        quality: &str,
    ) -> RawResult {
        RawResult {
            quality: Some(quality.to_string()),
            ..raw_result(provider, metadata, info_hash, seeders)
        }
    }

    /// An episode release name such as `Show.Name.S02E05.1080p`.
    pub fn episode_result(
        provider: &str,
        season: u32,
        episode: u32,
        quality: &str,
        info_hash: &str,
        seeders: u32,
    ) -> RawResult {
        raw_result(
            provider,
            &format!("Show.Name.S{:02}E{:02}.{}", season, episode, quality),
            info_hash,
            seeders,
        )
    }
}
