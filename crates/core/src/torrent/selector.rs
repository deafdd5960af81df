//! Reduction of a candidate list to one torrent per quality tier.

use super::types::{NormalizedTorrent, TorrentSelection};

/// Stable sort by seeders, descending. Ties keep encounter order.
pub fn sort_by_seeders(torrents: &mut [NormalizedTorrent]) {
    torrents.sort_by(|a, b| b.seeders.cmp(&a.seeders));
}

/// Pick the best-seeded torrent for each of 1080p, 720p and 480p.
///
/// Candidates with n/a quality or no magnet are discarded first.
pub fn select_torrents(candidates: Vec<NormalizedTorrent>) -> TorrentSelection {
    let mut eligible: Vec<NormalizedTorrent> = candidates
        .into_iter()
        .filter(NormalizedTorrent::is_selectable)
        .collect();
    sort_by_seeders(&mut eligible);

    let mut selection = TorrentSelection::default();
    for torrent in eligible {
        selection.fill(torrent);
    }
    selection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::torrent::types::{ContentKind, Quality};

    fn make(name: &str, quality: Quality, seeders: u32) -> NormalizedTorrent {
        NormalizedTorrent {
            metadata: name.to_string(),
            magnet: format!("magnet:?xt=urn:btih:{}", name),
            seeders,
            leechers: 0,
            quality,
            health: 0,
            method: ContentKind::Movies,
            provider: "test".to_string(),
        }
    }

    #[test]
    fn test_highest_seeders_wins_tier() {
        let selection = select_torrents(vec![
            make("B", Quality::P1080, 10),
            make("A", Quality::P1080, 50),
        ]);
        assert_eq!(selection.get(Quality::P1080).unwrap().metadata, "A");
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_one_per_tier_and_tier_matches_quality() {
        let selection = select_torrents(vec![
            make("a", Quality::P720, 30),
            make("b", Quality::P480, 3),
            make("c", Quality::P1080, 7),
            make("d", Quality::P720, 40),
            make("e", Quality::P480, 9),
        ]);

        assert_eq!(selection.len(), 3);
        for (tier, torrent) in selection.iter() {
            assert_eq!(torrent.quality, tier);
        }
        assert_eq!(selection.get(Quality::P720).unwrap().metadata, "d");
        assert_eq!(selection.get(Quality::P480).unwrap().metadata, "e");
    }

    #[test]
    fn test_ties_keep_encounter_order() {
        let selection = select_torrents(vec![
            make("first", Quality::P720, 20),
            make("second", Quality::P720, 20),
        ]);
        assert_eq!(selection.get(Quality::P720).unwrap().metadata, "first");
    }

    #[test]
    fn test_discards_na_and_missing_magnet() {
        let mut no_magnet = make("no-magnet", Quality::P1080, 500);
        no_magnet.magnet = String::new();

        let selection = select_torrents(vec![
            make("na", Quality::NotAvailable, 1000),
            no_magnet,
            make("ok", Quality::P1080, 1),
        ]);

        assert_eq!(selection.get(Quality::P1080).unwrap().metadata, "ok");
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(select_torrents(vec![]).is_empty());
    }
}
