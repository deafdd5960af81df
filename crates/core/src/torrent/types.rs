//! Types shared by the normalization, filtering and selection stages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What kind of content a query asks for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Movies,
    Shows,
    SeasonComplete,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Movies => "movies",
            ContentKind::Shows => "shows",
            ContentKind::SeasonComplete => "season_complete",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movies" => Ok(ContentKind::Movies),
            "shows" => Ok(ContentKind::Shows),
            "season_complete" => Ok(ContentKind::SeasonComplete),
            other => Err(format!("unrecognized content kind: {}", other)),
        }
    }
}

/// Resolution bucket of a torrent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Quality {
    #[serde(rename = "480p")]
    P480,
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "1080p")]
    P1080,
    #[serde(rename = "n/a")]
    NotAvailable,
}

impl Quality {
    /// Selectable tiers, best first.
    pub const TIERS: [Quality; 3] = [Quality::P1080, Quality::P720, Quality::P480];

    /// Map a provider-supplied label. Anything outside the three tiers is n/a.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "480p" => Quality::P480,
            "720p" => Quality::P720,
            "1080p" => Quality::P1080,
            _ => Quality::NotAvailable,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::P480 => "480p",
            Quality::P720 => "720p",
            Quality::P1080 => "1080p",
            Quality::NotAvailable => "n/a",
        }
    }

    pub fn is_tier(&self) -> bool {
        !matches!(self, Quality::NotAvailable)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A result exactly as a provider returned it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawResult {
    /// Which provider produced this result.
    pub provider: String,
    /// Release name or other free-text description.
    pub metadata: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnet: Option<String>,
    #[serde(default)]
    pub seeders: u32,
    #[serde(default)]
    pub leechers: u32,
    /// Quality label, when the provider classifies its own results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
}

/// Canonical torrent produced from one `RawResult`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedTorrent {
    pub metadata: String,
    /// Empty when the provider gave no magnet.
    pub magnet: String,
    pub seeders: u32,
    pub leechers: u32,
    pub quality: Quality,
    pub health: u32,
    /// Query kind this torrent was normalized for.
    pub method: ContentKind,
    pub provider: String,
}

impl NormalizedTorrent {
    pub fn has_magnet(&self) -> bool {
        !self.magnet.trim().is_empty()
    }

    /// Eligible for a selection slot.
    pub fn is_selectable(&self) -> bool {
        self.quality.is_tier() && self.has_magnet()
    }

    pub fn health_tier(&self) -> HealthTier {
        HealthTier::from_counts(self.seeders, self.leechers)
    }
}

/// Coarse swarm health bucket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HealthTier {
    Poor,
    Decent,
    Healthy,
}

impl HealthTier {
    pub fn from_counts(seeders: u32, leechers: u32) -> Self {
        let ratio_ok = leechers == 0 || seeders > leechers;
        if seeders >= 100 && ratio_ok {
            HealthTier::Healthy
        } else if seeders >= 50 && ratio_ok {
            HealthTier::Decent
        } else {
            HealthTier::Poor
        }
    }
}

/// At most one torrent per quality tier.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TorrentSelection {
    #[serde(rename = "1080p", default, skip_serializing_if = "Option::is_none")]
    pub p1080: Option<NormalizedTorrent>,
    #[serde(rename = "720p", default, skip_serializing_if = "Option::is_none")]
    pub p720: Option<NormalizedTorrent>,
    #[serde(rename = "480p", default, skip_serializing_if = "Option::is_none")]
    pub p480: Option<NormalizedTorrent>,
}

impl TorrentSelection {
    pub fn get(&self, tier: Quality) -> Option<&NormalizedTorrent> {
        match tier {
            Quality::P1080 => self.p1080.as_ref(),
            Quality::P720 => self.p720.as_ref(),
            Quality::P480 => self.p480.as_ref(),
            Quality::NotAvailable => None,
        }
    }

    /// Fill a tier slot. Returns false (and leaves the selection untouched)
    /// for n/a or an already-filled slot.
    pub(crate) fn fill(&mut self, torrent: NormalizedTorrent) -> bool {
        let slot = match torrent.quality {
            Quality::P1080 => &mut self.p1080,
            Quality::P720 => &mut self.p720,
            Quality::P480 => &mut self.p480,
            Quality::NotAvailable => return false,
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(torrent);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (Quality, &NormalizedTorrent)> {
        Quality::TIERS
            .into_iter()
            .filter_map(move |tier| self.get(tier).map(|t| (tier, t)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
