use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aggregator_core::{
    load_config, validate_config, Aggregator, IdTranslator, LogFormat, Normalizer,
    ProviderRegistry, QueryCache, SanitizedConfig, TmdbTranslator,
};
use aggregator_server::api::create_router;
use aggregator_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn run() -> Result<()> {
    // Determine config path
    let config_path = std::env::var("AGGREGATOR_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("aggregator.toml"));

    // Logging format comes from the config, so load it first
    let config = match load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            init_logging(LogFormat::default());
            return Err(e)
                .with_context(|| format!("Failed to load config from {:?}", config_path));
        }
    };

    init_logging(config.logging.format);
    info!(version = VERSION, "Loaded configuration from {:?}", config_path);

    validate_config(&config).context("Configuration validation failed")?;

    let config_json = serde_json::to_string(&SanitizedConfig::from(&config)).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(config_hash = &config_hash[..16], "Configuration validated");

    // Providers are built on first use
    let enabled: Vec<&str> = config
        .providers
        .iter()
        .filter(|p| p.enabled)
        .map(|p| p.name.as_str())
        .collect();
    info!(providers = ?enabled, "Provider registry configured");
    let registry = Arc::new(ProviderRegistry::from_config(config.providers.clone()));

    let mut aggregator = Aggregator::new(registry, QueryCache::new())
        .with_normalizer(Normalizer::new(config.quality.clone()))
        .with_cache_config(config.cache.clone());

    match &config.translation {
        Some(translation) => {
            let translator = TmdbTranslator::new(translation)
                .context("Failed to create identifier translator")?;
            info!(translator = translator.name(), "Identifier translation enabled");
            aggregator = aggregator.with_translator(Arc::new(translator));
        }
        None => warn!("No translation configured; only IMDB ids can be resolved"),
    }

    let state = Arc::new(AppState::new(config.clone(), Arc::new(aggregator)));
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
