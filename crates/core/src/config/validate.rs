use std::collections::HashSet;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - At least one provider is enabled
/// - Provider names are unique
/// - Translation API key is set when translation is configured
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if !config.providers.iter().any(|p| p.enabled) {
        return Err(ConfigError::ValidationError(
            "at least one provider must be enabled".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for provider in &config.providers {
        if provider.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "provider name cannot be empty".to_string(),
            ));
        }
        if !seen.insert(provider.name.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate provider name: {}",
                provider.name
            )));
        }
        if provider.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(format!(
                "providers.{}.timeout_secs cannot be 0",
                provider.name
            )));
        }
    }

    if let Some(translation) = &config.translation {
        if translation.api_key.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "translation.api_key cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        CacheConfig, LoggingConfig, ProviderConfig, ProviderKind, QualityConfig, ServerConfig,
        TranslationConfig,
    };

    fn provider(name: &str, enabled: bool) -> ProviderConfig {
        ProviderConfig {
            name: name.to_string(),
            kind: ProviderKind::Yts,
            enabled,
            base_url: None,
            timeout_secs: 30,
        }
    }

    fn config_with(providers: Vec<ProviderConfig>) -> Config {
        Config {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            providers,
            translation: None,
            cache: CacheConfig::default(),
            quality: QualityConfig::default(),
        }
    }

    #[test]
    fn test_validate_valid_config() {
        let config = config_with(vec![provider("yts", true), provider("popcorn", false)]);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = config_with(vec![provider("yts", true)]);
        config.server.port = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_requires_enabled_provider() {
        let config = config_with(vec![provider("yts", false)]);
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("at least one provider"));

        let config = config_with(vec![]);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_duplicate_names_fail() {
        let config = config_with(vec![provider("yts", true), provider("yts", false)]);
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("duplicate provider name: yts"));
    }

    #[test]
    fn test_validate_empty_translation_key_fails() {
        let mut config = config_with(vec![provider("yts", true)]);
        config.translation = Some(TranslationConfig {
            api_key: "  ".to_string(),
            base_url: None,
            timeout_secs: 30,
        });
        assert!(validate_config(&config).is_err());
    }
}
