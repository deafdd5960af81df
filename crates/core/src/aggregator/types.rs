//! Request, response and error types of the aggregation dispatcher.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::provider::ProviderError;
use crate::torrent::{ContentKind, RawResult, TorrentSelection};
use crate::translation::TranslationError;

/// Episode coordinates of a show query.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ExtendedDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
}

impl ExtendedDetails {
    pub fn episode(season: u32, episode: u32) -> Self {
        Self {
            season: Some(season),
            episode: Some(episode),
        }
    }

    pub fn season(season: u32) -> Self {
        Self {
            season: Some(season),
            episode: None,
        }
    }
}

/// How concurrent provider calls are combined.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum JoinPolicy {
    /// Wait for every provider, merge, filter and select.
    #[default]
    All,
    /// Return the raw output of whichever provider settles first.
    Race,
}

impl JoinPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinPolicy::All => "all",
            JoinPolicy::Race => "race",
        }
    }
}

impl fmt::Display for JoinPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoinPolicy {
    type Err = AggregatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(JoinPolicy::All),
            "race" => Ok(JoinPolicy::Race),
            other => Err(AggregatorError::InvalidMethod(format!(
                "unrecognized join policy: {}",
                other
            ))),
        }
    }
}

/// A validated resolve request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolveRequest {
    pub id: String,
    pub kind: ContentKind,
    #[serde(default)]
    pub details: ExtendedDetails,
    #[serde(default)]
    pub return_all: bool,
    #[serde(default)]
    pub method: JoinPolicy,
    #[serde(default = "default_use_cache")]
    pub use_cache: bool,
}

fn default_use_cache() -> bool {
    true
}

impl ResolveRequest {
    /// A request with the default policy (`all`) and caching enabled.
    pub fn new(id: impl Into<String>, kind: ContentKind) -> Self {
        Self {
            id: id.into(),
            kind,
            details: ExtendedDetails::default(),
            return_all: false,
            method: JoinPolicy::All,
            use_cache: true,
        }
    }

    pub fn with_details(mut self, details: ExtendedDetails) -> Self {
        self.details = details;
        self
    }

    pub fn with_method(mut self, method: JoinPolicy) -> Self {
        self.method = method;
        self
    }

    pub fn with_return_all(mut self, return_all: bool) -> Self {
        self.return_all = return_all;
        self
    }

    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }
}

/// Untyped resolve parameters as received from an outer surface.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveParams {
    pub id: String,
    pub kind: String,
    #[serde(default)]
    pub season: Option<u32>,
    #[serde(default)]
    pub episode: Option<u32>,
    #[serde(default)]
    pub return_all: bool,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub use_cache: Option<bool>,
}

impl TryFrom<ResolveParams> for ResolveRequest {
    type Error = AggregatorError;

    fn try_from(params: ResolveParams) -> Result<Self, Self::Error> {
        let method = match params.method.as_deref() {
            Some(method) => method.parse()?,
            None => JoinPolicy::default(),
        };
        let kind: ContentKind = params
            .kind
            .parse()
            .map_err(AggregatorError::InvalidMethod)?;

        Ok(ResolveRequest {
            id: params.id,
            kind,
            details: ExtendedDetails {
                season: params.season,
                episode: params.episode,
            },
            return_all: params.return_all,
            method,
            use_cache: params.use_cache.unwrap_or(true),
        })
    }
}

/// Outcome of a resolve call.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Resolution {
    /// Merged, filtered, one-per-tier result of the `all` policy.
    Selection { torrents: TorrentSelection },
    /// Unprocessed output of the first provider to settle under `race`.
    Raw {
        provider: String,
        results: Vec<RawResult>,
    },
}

impl Resolution {
    pub fn selection(&self) -> Option<&TorrentSelection> {
        match self {
            Resolution::Selection { torrents } => Some(torrents),
            Resolution::Raw { .. } => None,
        }
    }

    pub fn into_selection(self) -> Option<TorrentSelection> {
        match self {
            Resolution::Selection { torrents } => Some(torrents),
            Resolution::Raw { .. } => None,
        }
    }
}

/// Errors surfaced by the dispatcher.
#[derive(Debug, Error)]
pub enum AggregatorError {
    #[error("Invalid query method: {0}")]
    InvalidMethod(String),

    #[error("Missing request detail: {0}")]
    MissingDetails(String),

    #[error("Provider {provider} failed: {source}")]
    ProviderFailure {
        provider: String,
        #[source]
        source: ProviderError,
    },

    #[error("Identifier translation failed: {0}")]
    TranslationFailure(#[from] TranslationError),

    #[error("Provider registry unavailable: {0}")]
    Registry(#[source] ProviderError),

    #[error("No providers registered")]
    NoProviders,
}
