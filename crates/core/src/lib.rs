pub mod aggregator;
pub mod cache;
pub mod config;
pub mod metrics;
pub mod provider;
pub mod testing;
pub mod torrent;
pub mod translation;

pub use aggregator::{
    Aggregator, AggregatorError, ExtendedDetails, JoinPolicy, Resolution, ResolveParams,
    ResolveRequest,
};
pub use cache::{QueryCache, QuerySignature};
pub use config::{
    load_config, load_config_from_str, validate_config, CacheConfig, CacheKeyScope, Config,
    ConfigError, LogFormat, ProviderConfig, ProviderKind, QualityConfig, SanitizedConfig,
    TranslationConfig,
};
pub use provider::{
    build_provider, build_providers, Provider, ProviderError, ProviderRegistry,
    ProviderStatusReport,
};
pub use torrent::{ContentKind, NormalizedTorrent, Normalizer, Quality, RawResult, TorrentSelection};
pub use translation::{is_native_id, IdTranslator, TmdbTranslator, TranslationError};
