//! TMDB (The Movie Database) id translation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::TranslationConfig;
use crate::torrent::ContentKind;

use super::{IdTranslator, TranslationError};

const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Resolves TMDB ids to IMDB ids through the `external_ids` endpoints.
pub struct TmdbTranslator {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbTranslator {
    pub fn new(config: &TranslationConfig) -> Result<Self, TranslationError> {
        if config.api_key.is_empty() {
            return Err(TranslationError::NotConfigured(
                "TMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn external_ids_url(&self, tmdb_id: &str, kind: ContentKind) -> String {
        let media = match kind {
            ContentKind::Movies => "movie",
            ContentKind::Shows | ContentKind::SeasonComplete => "tv",
        };
        format!(
            "{}/{}/{}/external_ids",
            self.base_url,
            media,
            urlencoding::encode(tmdb_id)
        )
    }
}

#[async_trait]
impl IdTranslator for TmdbTranslator {
    fn name(&self) -> &str {
        "tmdb"
    }

    async fn translate(
        &self,
        external_id: &str,
        kind: ContentKind,
    ) -> Result<String, TranslationError> {
        let url = self.external_ids_url(external_id, kind);
        debug!("TMDB external ids: id={}, kind={}", external_id, kind);

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", &self.api_key)])
            .send()
            .await?;

        let status = response.status();
        if status == 401 {
            return Err(TranslationError::NotConfigured(
                "Invalid TMDB API key".to_string(),
            ));
        }
        if status == 404 {
            return Err(TranslationError::NotFound(external_id.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let ids: ExternalIds = response.json().await.map_err(|e| {
            TranslationError::ParseError(format!("Failed to parse external ids: {}", e))
        })?;

        ids.imdb_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| TranslationError::NotFound(external_id.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct ExternalIds {
    #[serde(default)]
    imdb_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: &str) -> TranslationConfig {
        TranslationConfig {
            api_key: api_key.to_string(),
            base_url: Some("http://localhost:1234/3/".to_string()),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_requires_api_key() {
        let result = TmdbTranslator::new(&config(""));
        assert!(matches!(result, Err(TranslationError::NotConfigured(_))));
    }

    #[test]
    fn test_external_ids_url() {
        let translator = TmdbTranslator::new(&config("key")).unwrap();
        assert_eq!(
            translator.external_ids_url("278", ContentKind::Movies),
            "http://localhost:1234/3/movie/278/external_ids"
        );
        assert_eq!(
            translator.external_ids_url("1399", ContentKind::SeasonComplete),
            "http://localhost:1234/3/tv/1399/external_ids"
        );
    }

    #[test]
    fn test_parse_external_ids() {
        let ids: ExternalIds =
            serde_json::from_str(r#"{"id": 278, "imdb_id": "tt0111161"}"#).unwrap();
        assert_eq!(ids.imdb_id.as_deref(), Some("tt0111161"));

        let ids: ExternalIds = serde_json::from_str(r#"{"id": 1, "imdb_id": null}"#).unwrap();
        assert!(ids.imdb_id.is_none());
    }
}
