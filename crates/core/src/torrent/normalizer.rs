//! Conversion of provider results into canonical torrents.

use crate::config::QualityConfig;

use super::types::{ContentKind, NormalizedTorrent, Quality, RawResult};

/// Markers that only appear in releases with burned-in subtitles.
const SUBTITLE_MARKERS: &[&str] = &["hardsub", "hc ", "subbed", " sub ", ".sub.", "subs"];

/// Converts `RawResult`s into `NormalizedTorrent`s.
///
/// Provider-supplied quality labels are passed through; everything else is
/// classified from the release name (or the magnet when the name is empty).
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    rules: QualityConfig,
}

impl Normalizer {
    pub fn new(rules: QualityConfig) -> Self {
        Self { rules }
    }

    pub fn normalize(&self, raw: RawResult, method: ContentKind) -> NormalizedTorrent {
        let magnet = raw.magnet.unwrap_or_default();
        let quality = match raw.quality.as_deref() {
            Some(label) => Quality::from_label(label),
            None => self.classify(&magnet, &raw.metadata),
        };

        NormalizedTorrent {
            health: health_score(raw.seeders, raw.leechers),
            metadata: raw.metadata,
            magnet,
            seeders: raw.seeders,
            leechers: raw.leechers,
            quality,
            method,
            provider: raw.provider,
        }
    }

    /// Classify quality from free text.
    pub fn classify(&self, magnet: &str, metadata: &str) -> Quality {
        let source = if metadata.trim().is_empty() {
            magnet
        } else {
            metadata
        };
        let text = source.to_lowercase();

        if self.has_rejected_language(&text) {
            return Quality::NotAvailable;
        }
        if self.rules.reject_hardcoded_subtitles && has_hardcoded_subtitles(&text) {
            return Quality::NotAvailable;
        }

        if text.contains("1080") {
            return Quality::P1080;
        }
        if text.contains("720") {
            return Quality::P720;
        }
        if text.contains("480") {
            return Quality::P480;
        }

        if ["bluray", "bdrip", "brrip"].iter().any(|m| text.contains(m)) {
            return Quality::P1080;
        }
        if ["dvd", "rip", "mp4", "web", "hdtv", "eng"]
            .iter()
            .any(|m| text.contains(m))
        {
            return Quality::P720;
        }

        if self.rules.accept_unverified_codecs && (text.contains("avi") || text.contains("mkv")) {
            return Quality::P720;
        }

        Quality::NotAvailable
    }

    fn has_rejected_language(&self, text: &str) -> bool {
        self.rules
            .rejected_languages
            .iter()
            .any(|lang| !lang.is_empty() && text.contains(lang.to_lowercase().as_str()))
    }
}

fn has_hardcoded_subtitles(text: &str) -> bool {
    // Pad so markers anchored on spaces also match at the edges.
    let padded = format!(" {} ", text);
    SUBTITLE_MARKERS.iter().any(|m| padded.contains(m))
}

/// Swarm health score. Non-decreasing in seeders, non-increasing in leechers.
pub fn health_score(seeders: u32, leechers: u32) -> u32 {
    let ratio_bonus = (seeders.saturating_mul(10) / leechers.saturating_add(1)).min(100);
    seeders.saturating_mul(2).saturating_add(ratio_bonus)
}

/// `s02e05` style token shared by the filters.
pub fn format_season_episode(season: u32, episode: u32) -> String {
    format!("s{:02}e{:02}", season, episode)
}

/// `s02` style token shared by the filters.
pub fn format_season(season: u32) -> String {
    format!("s{:02}", season)
}
