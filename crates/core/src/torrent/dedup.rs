//! Deduplication of normalized torrents by info hash.

use std::collections::HashMap;

use super::types::NormalizedTorrent;

/// Extract the BitTorrent info hash (lowercase) from a magnet URI.
pub fn info_hash(magnet: &str) -> Option<String> {
    let query = magnet.strip_prefix("magnet:?")?;
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.eq_ignore_ascii_case("xt"))
        .and_then(|(_, value)| {
            let lower = value.to_lowercase();
            lower.strip_prefix("urn:btih:").map(|h| h.to_string())
        })
        .filter(|h| !h.is_empty())
}

/// Collapse torrents sharing an info hash.
///
/// Each hash keeps the position of its first occurrence; the selectable entry
/// with the most seeders occupies that position (ties keep the earlier one).
/// An entry with n/a quality never displaces a selectable one. Torrents
/// without a recognizable hash are kept as they are.
pub fn deduplicate(torrents: Vec<NormalizedTorrent>) -> Vec<NormalizedTorrent> {
    let mut by_hash: HashMap<String, usize> = HashMap::new();
    let mut results: Vec<NormalizedTorrent> = Vec::with_capacity(torrents.len());

    for torrent in torrents {
        match info_hash(&torrent.magnet) {
            Some(hash) => {
                if let Some(&index) = by_hash.get(&hash) {
                    if replaces(&results[index], &torrent) {
                        results[index] = torrent;
                    }
                } else {
                    by_hash.insert(hash, results.len());
                    results.push(torrent);
                }
            }
            None => results.push(torrent),
        }
    }

    results
}

fn replaces(kept: &NormalizedTorrent, candidate: &NormalizedTorrent) -> bool {
    match (kept.is_selectable(), candidate.is_selectable()) {
        (false, true) => true,
        (true, false) => false,
        _ => candidate.seeders > kept.seeders,
    }
}
