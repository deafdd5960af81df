//! Popcorn Time API provider (movies and shows).

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::torrent::{format_season_episode, ContentKind, RawResult};

use super::{Provider, ProviderError};

const DEFAULT_BASE_URL: &str = "https://popcorn-time.ga";

/// Language whose movie torrents are reported.
const MOVIE_LANGUAGE: &str = "en";

/// Popcorn Time API client.
pub struct PopcornProvider {
    client: Client,
    name: String,
    base_url: String,
}

impl PopcornProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| ProviderError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            name: config.name.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }

    /// GET a JSON document. A 404 means the title is unknown to the provider.
    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, ProviderError> {
        debug!(provider = %self.name, url = url, "Querying Popcorn API");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        // The API answers unknown ids with an empty body.
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    fn movie_results(&self, movie: PctMovie) -> Vec<RawResult> {
        let Some(torrents) = movie.torrents.get(MOVIE_LANGUAGE) else {
            return Vec::new();
        };

        torrents
            .iter()
            .filter(|(quality, _)| quality.as_str() != "0")
            .map(|(quality, torrent)| RawResult {
                provider: self.name.clone(),
                metadata: format!("{} {}", movie.title, quality),
                magnet: Some(torrent.url.clone()),
                seeders: torrent.seeders(),
                leechers: torrent.leechers(),
                quality: Some(quality.clone()),
            })
            .collect()
    }

    fn show_results(&self, show: PctShow) -> Vec<RawResult> {
        let mut results = Vec::new();
        for episode in &show.episodes {
            let token = format_season_episode(episode.season, episode.episode).to_uppercase();
            for (quality, torrent) in &episode.torrents {
                if quality == "0" {
                    continue;
                }
                results.push(RawResult {
                    provider: self.name.clone(),
                    metadata: format!("{} {} {}", show.title, token, quality),
                    magnet: Some(torrent.url.clone()),
                    seeders: torrent.seeders(),
                    leechers: torrent.leechers(),
                    quality: Some(quality.clone()),
                });
            }
        }
        results
    }
}

#[async_trait]
impl Provider for PopcornProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn provide(&self, id: &str, kind: ContentKind) -> Result<Vec<RawResult>, ProviderError> {
        let id = urlencoding::encode(id);
        let results = match kind {
            ContentKind::Movies => self
                .fetch::<PctMovie>(&format!("{}/movie/{}", self.base_url, id))
                .await?
                .map(|movie| self.movie_results(movie)),
            ContentKind::Shows | ContentKind::SeasonComplete => self
                .fetch::<PctShow>(&format!("{}/show/{}", self.base_url, id))
                .await?
                .map(|show| self.show_results(show)),
        }
        .unwrap_or_default();

        debug!(provider = %self.name, results = results.len(), "Popcorn query complete");
        Ok(results)
    }

    async fn status(&self) -> Result<bool, ProviderError> {
        match self.client.get(&self.base_url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                debug!(provider = %self.name, error = %e, "Popcorn API unreachable");
                Ok(false)
            }
        }
    }
}

// Popcorn API response types
#[derive(Debug, Deserialize)]
struct PctMovie {
    title: String,
    /// language -> quality -> torrent
    #[serde(default)]
    torrents: BTreeMap<String, BTreeMap<String, PctTorrent>>,
}

#[derive(Debug, Deserialize)]
struct PctShow {
    title: String,
    #[serde(default)]
    episodes: Vec<PctEpisode>,
}

#[derive(Debug, Deserialize)]
struct PctEpisode {
    season: u32,
    episode: u32,
    /// quality -> torrent
    #[serde(default)]
    torrents: BTreeMap<String, PctTorrent>,
}

/// Movie torrents use `seed`/`peer`, episode torrents `seeds`/`peers`.
#[derive(Debug, Deserialize)]
struct PctTorrent {
    url: String,
    #[serde(default, alias = "seeds")]
    seed: Option<u32>,
    #[serde(default, alias = "peers")]
    peer: Option<u32>,
}

impl PctTorrent {
    fn seeders(&self) -> u32 {
        self.seed.unwrap_or(0)
    }

    fn leechers(&self) -> u32 {
        self.peer.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;

    fn provider() -> PopcornProvider {
        PopcornProvider::new(&ProviderConfig {
            name: "popcorn".to_string(),
            kind: ProviderKind::Popcorn,
            enabled: true,
            base_url: Some("http://localhost:1234/".to_string()),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(provider().base_url, "http://localhost:1234");
    }

    #[test]
    fn test_movie_results_english_only() {
        let json = r#"{
            "title": "Inception",
            "torrents": {
                "en": {
                    "1080p": {"url": "magnet:?xt=urn:btih:aaa", "seed": 300, "peer": 20},
                    "720p": {"url": "magnet:?xt=urn:btih:bbb", "seed": 150, "peer": 10}
                },
                "fr": {
                    "1080p": {"url": "magnet:?xt=urn:btih:ccc", "seed": 999, "peer": 1}
                }
            }
        }"#;
        let movie: PctMovie = serde_json::from_str(json).unwrap();
        let results = provider().movie_results(movie);

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.provider == "popcorn"));
        let full_hd = results.iter().find(|r| r.quality.as_deref() == Some("1080p")).unwrap();
        assert_eq!(full_hd.metadata, "Inception 1080p");
        assert_eq!(full_hd.seeders, 300);
        assert_eq!(full_hd.leechers, 20);
    }

    #[test]
    fn test_show_results_flatten_episodes() {
        let json = r#"{
            "title": "Show Name",
            "episodes": [
                {"season": 2, "episode": 5, "torrents": {
                    "0": {"url": "magnet:?xt=urn:btih:zero", "seeds": 1, "peers": 0},
                    "720p": {"url": "magnet:?xt=urn:btih:ep5", "seeds": 12, "peers": 2}
                }},
                {"season": 2, "episode": 6, "torrents": {
                    "480p": {"url": "magnet:?xt=urn:btih:ep6", "seeds": 4, "peers": 1}
                }}
            ]
        }"#;
        let show: PctShow = serde_json::from_str(json).unwrap();
        let results = provider().show_results(show);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].metadata, "Show Name S02E05 720p");
        assert_eq!(results[0].seeders, 12);
        assert_eq!(results[1].metadata, "Show Name S02E06 480p");
    }

    #[test]
    fn test_missing_counts_default_to_zero() {
        let torrent: PctTorrent = serde_json::from_str(r#"{"url": "magnet:?xt=urn:btih:a"}"#).unwrap();
        assert_eq!(torrent.seeders(), 0);
        assert_eq!(torrent.leechers(), 0);
    }
}
