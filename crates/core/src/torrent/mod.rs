//! Torrent result processing: normalization, deduplication, content
//! filtering and per-tier selection.

mod dedup;
mod filter;
mod normalizer;
mod selector;
mod types;

pub use dedup::{deduplicate, info_hash};
pub use filter::{matches_complete_season, matches_episode, ContentFilter};
pub use normalizer::{format_season, format_season_episode, health_score, Normalizer};
pub use selector::{select_torrents, sort_by_seeders};
pub use types::*;
