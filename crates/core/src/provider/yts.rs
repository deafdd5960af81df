//! YTS movie provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::torrent::{ContentKind, RawResult};

use super::{Provider, ProviderError};

const DEFAULT_BASE_URL: &str = "https://yts.mx/api/v2";

const TRACKERS: &[&str] = &[
    "udp://open.demonii.com:1337/announce",
    "udp://tracker.openbittorrent.com:80",
    "udp://tracker.coppersurfer.tk:6969",
    "udp://glotorrents.pw:6969/announce",
    "udp://tracker.opentrackr.org:1337/announce",
];

/// YTS API client. Only answers movie queries.
pub struct YtsProvider {
    client: Client,
    name: String,
    base_url: String,
}

impl YtsProvider {
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
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    fn build_search_url(&self, id: &str) -> String {
        format!(
            "{}/list_movies.json?query_term={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(id)
        )
    }

    fn to_raw_results(&self, response: YtsResponse) -> Vec<RawResult> {
        response
            .data
            .movies
            .unwrap_or_default()
            .into_iter()
            .flat_map(|movie| {
                let title = movie.title_long;
                movie.torrents.into_iter().map(move |t| RawResult {
                    provider: self.name.clone(),
                    metadata: format!("{} {} {}", title, t.quality, t.kind)
                        .trim()
                        .to_string(),
                    magnet: Some(build_magnet(&t.hash, &title)),
                    seeders: t.seeds,
                    leechers: t.peers,
                    quality: Some(t.quality),
                })
            })
            .collect()
    }
}

#[async_trait]
impl Provider for YtsProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn provide(&self, id: &str, kind: ContentKind) -> Result<Vec<RawResult>, ProviderError> {
        if kind != ContentKind::Movies {
            return Ok(Vec::new());
        }

        let url = self.build_search_url(id);
        debug!(provider = %self.name, id = id, "Querying YTS");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: YtsResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        if parsed.status != "ok" {
            return Err(ProviderError::ApiError(parsed.status_message));
        }

        let results = self.to_raw_results(parsed);
        debug!(provider = %self.name, results = results.len(), "YTS query complete");
        Ok(results)
    }

    async fn status(&self) -> Result<bool, ProviderError> {
        match self.client.get(&self.base_url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                debug!(provider = %self.name, error = %e, "YTS unreachable");
                Ok(false)
            }
        }
    }
}

fn build_magnet(hash: &str, title: &str) -> String {
    let mut magnet = format!(
        "magnet:?xt=urn:btih:{}&dn={}",
        hash.to_lowercase(),
        urlencoding::encode(title)
    );
    for tracker in TRACKERS {
        magnet.push_str("&tr=");
        magnet.push_str(&urlencoding::encode(tracker));
    }
    magnet
}

// YTS API response types
#[derive(Debug, Deserialize)]
struct YtsResponse {
    status: String,
    #[serde(default)]
    status_message: String,
    #[serde(default)]
    data: YtsData,
}

#[derive(Debug, Default, Deserialize)]
struct YtsData {
    #[serde(default)]
    movies: Option<Vec<YtsMovie>>,
}

#[derive(Debug, Deserialize)]
struct YtsMovie {
    title_long: String,
    #[serde(default)]
    torrents: Vec<YtsTorrent>,
}

#[derive(Debug, Deserialize)]
struct YtsTorrent {
    hash: String,
    quality: String,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    seeds: u32,
    #[serde(default)]
    peers: u32,
}
