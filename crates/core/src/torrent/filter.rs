//! Content filters deciding whether a torrent answers the requested query.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::normalizer::{format_season, format_season_episode};
use super::types::NormalizedTorrent;

/// Any single-episode marker: `s03e01`, `s3 e1`, or a standalone `e01`.
static EPISODE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"s\d{1,2}\s?e\d{1,3}|\be\d{2,3}\b").expect("episode token pattern is valid")
});

/// Filter selected by the query kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFilter {
    /// Movies: no content check beyond the selector's validity rules.
    PassThrough,
    Episode { season: u32, episode: u32 },
    CompleteSeason { season: u32 },
}

impl ContentFilter {
    pub fn matches(&self, torrent: &NormalizedTorrent) -> bool {
        match *self {
            ContentFilter::PassThrough => true,
            ContentFilter::Episode { season, episode } => {
                matches_episode(torrent, season, episode)
            }
            ContentFilter::CompleteSeason { season } => matches_complete_season(torrent, season),
        }
    }

    /// Drop torrents with no metadata, then apply the filter.
    pub fn apply(&self, torrents: Vec<NormalizedTorrent>) -> Vec<NormalizedTorrent> {
        torrents
            .into_iter()
            .filter(|t| !t.metadata.trim().is_empty())
            .filter(|t| self.matches(t))
            .collect()
    }
}

/// True iff the release names the exact `SxxEyy` episode, is seeded and has a magnet.
pub fn matches_episode(torrent: &NormalizedTorrent, season: u32, episode: u32) -> bool {
    let text = release_text(&torrent.metadata);
    text.contains(&format_season_episode(season, episode)) && is_live(torrent)
}

/// True iff the release looks like a whole season.
///
/// Accepts any of the common "complete season" namings, or a bare season
/// token with no episode token anywhere in the name. Permissive on purpose:
/// misnamed season packs are common.
pub fn matches_complete_season(torrent: &NormalizedTorrent, season: u32) -> bool {
    let text = release_text(&torrent.metadata);

    let named_complete = [
        format!("{} complete", season),
        format!("{} [complete]", season),
        format!("{} - complete", season),
        format!("season {}", season),
        format!("season {:02}", season),
    ]
    .iter()
    .any(|pattern| text.contains(pattern.as_str()));

    let bare_season = text.contains(&format_season(season)) && !EPISODE_TOKEN.is_match(&text);

    (named_complete || bare_season) && is_live(torrent)
}

fn is_live(torrent: &NormalizedTorrent) -> bool {
    torrent.seeders > 0 && torrent.has_magnet()
}

/// Lowercase the release name and treat dots and underscores as spaces.
fn release_text(metadata: &str) -> String {
    metadata
        .to_lowercase()
        .chars()
        .map(|c| if c == '.' || c == '_' { ' ' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::torrent::types::{ContentKind, Quality};

    fn torrent(metadata: &str, seeders: u32, magnet: &str) -> NormalizedTorrent {
        NormalizedTorrent {
            metadata: metadata.to_string(),
            magnet: magnet.to_string(),
            seeders,
            leechers: 0,
            quality: Quality::P1080,
            health: 0,
            method: ContentKind::Shows,
            provider: "test".to_string(),
        }
    }

    const MAGNET: &str = "magnet:?xt=urn:btih:abc";

    #[test]
    fn test_episode_match() {
        let t = torrent("Show.Name.S02E05.1080p", 3, MAGNET);
        assert!(matches_episode(&t, 2, 5));
        assert!(!matches_episode(&t, 2, 6));
        assert!(!matches_episode(&t, 3, 5));
    }

    #[test]
    fn test_episode_match_is_case_insensitive() {
        let t = torrent("show name s02e05 720p", 3, MAGNET);
        assert!(matches_episode(&t, 2, 5));
    }

    #[test]
    fn test_episode_requires_seeders_and_magnet() {
        assert!(!matches_episode(&torrent("Show.S02E05", 0, MAGNET), 2, 5));
        assert!(!matches_episode(&torrent("Show.S02E05", 5, ""), 2, 5));
    }

    #[test]
    fn test_complete_season_named() {
        let t = torrent("Show.Name.Season.3.Complete.720p", 10, MAGNET);
        assert!(matches_complete_season(&t, 3));
        assert!(!matches_complete_season(&t, 4));

        assert!(matches_complete_season(&torrent("Show 3 [Complete]", 1, MAGNET), 3));
        assert!(matches_complete_season(&torrent("Show 3 - Complete", 1, MAGNET), 3));
        assert!(matches_complete_season(&torrent("Show Season 03 720p", 1, MAGNET), 3));
    }

    #[test]
    fn test_complete_season_rejects_single_episode() {
        let t = torrent("Show.Name.S03E01", 10, MAGNET);
        assert!(!matches_complete_season(&t, 3));
    }

    #[test]
    fn test_complete_season_bare_token() {
        let t = torrent("Show.Name.S03.1080p.WEB", 10, MAGNET);
        assert!(matches_complete_season(&t, 3));
        assert!(!matches_complete_season(&t, 2));
    }

    #[test]
    fn test_complete_season_requires_seeders_and_magnet() {
        assert!(!matches_complete_season(&torrent("Show Season 3", 0, MAGNET), 3));
        assert!(!matches_complete_season(&torrent("Show Season 3", 4, ""), 3));
    }

    #[test]
    fn test_apply_drops_empty_metadata() {
        let filter = ContentFilter::PassThrough;
        let kept = filter.apply(vec![
            torrent("", 10, MAGNET),
            torrent("  ", 10, MAGNET),
            torrent("Movie", 10, MAGNET),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].metadata, "Movie");
    }

    #[test]
    fn test_pass_through_keeps_unseeded() {
        // Validity is the selector's job for movies
        assert!(ContentFilter::PassThrough.matches(&torrent("Movie", 0, "")));
    }
}
