use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Enabled providers, in registration order.
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
    #[serde(default)]
    pub translation: Option<TranslationConfig>,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub quality: QualityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Log output configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// A single provider entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Unique provider name (reported in statuses and logs).
    pub name: String,
    /// Which client implementation backs this entry.
    pub kind: ProviderKind,
    /// Disabled entries are skipped at registration.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Override of the client's default API base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

/// Available provider clients
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Yts,
    Popcorn,
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u32 {
    30
}

/// TMDB identifier translation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranslationConfig {
    /// TMDB API key
    pub api_key: String,
    /// Base URL (default: https://api.themoviedb.org/3)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

/// Query cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// When false every request skips the cache read (writes still happen).
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub key_scope: CacheKeyScope,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            key_scope: CacheKeyScope::default(),
        }
    }
}

/// Which request fields make up the cache signature.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CacheKeyScope {
    /// Details, return_all and join policy only. Two titles requested with the
    /// same details share an entry.
    #[default]
    Query,
    /// Additionally keyed by identifier and content kind.
    QueryAndId,
}

/// Quality classification rules for results without a provider label.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QualityConfig {
    /// Metadata mentioning any of these is classified n/a.
    #[serde(default = "default_rejected_languages")]
    pub rejected_languages: Vec<String>,
    /// Classify releases with burned-in subtitles as n/a.
    #[serde(default = "default_true")]
    pub reject_hardcoded_subtitles: bool,
    /// Accept bare avi/mkv releases as 720p.
    #[serde(default)]
    pub accept_unverified_codecs: bool,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            rejected_languages: default_rejected_languages(),
            reject_hardcoded_subtitles: true,
            accept_unverified_codecs: false,
        }
    }
}

fn default_rejected_languages() -> Vec<String> {
    [
        "french", "german", "greek", "dutch", "spanish", "russian", "korean", "hindi",
        "chinese", "hebrew", "italian", "japanese", "swesub", "nordic", "truefrench",
        "vostfr", "latino",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub providers: Vec<ProviderConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<SanitizedTranslationConfig>,
    pub cache: CacheConfig,
    pub quality: QualityConfig,
}

/// Sanitized translation config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTranslationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            providers: config.providers.clone(),
            translation: config
                .translation
                .as_ref()
                .map(|t| SanitizedTranslationConfig {
                    base_url: t.base_url.clone(),
                    api_key_configured: !t.api_key.is_empty(),
                    timeout_secs: t.timeout_secs,
                }),
            cache: config.cache.clone(),
            quality: config.quality.clone(),
        }
    }
}
