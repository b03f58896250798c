//! Configuration loader
//!
//! Layers, in order (later sources override earlier):
//! 1. `AppConfig::default()`
//! 2. TOML file (explicit path or first default location found)
//! 3. Environment variables, e.g. `MEETE__CACHE__DEFAULT_TTL_SECS=30`

use std::env;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use meete_domain::error::{Error, Result};
use reqwest::Url;

use crate::config::AppConfig;
use crate::config::types::CacheBackend;
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
};
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,

    /// Whether a configuration file must be found
    required: bool,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
            required: false,
        }
    }

    /// Set the configuration file path; a missing file is then fatal
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Fail when no configuration file can be found
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Load configuration from all sources
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        match &self.config_path {
            Some(config_path) => {
                if !config_path.exists() {
                    log_config_loaded(config_path, false);
                    return Err(Error::configuration(format!(
                        "Configuration file not found: {}",
                        config_path.display()
                    )));
                }
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            }
            None => match Self::find_default_config_path() {
                Some(default_path) => {
                    figment = figment.merge(Toml::file(&default_path));
                    log_config_loaded(&default_path, true);
                }
                None if self.required => {
                    return Err(Error::configuration(format!(
                        "No configuration source found (looked for {DEFAULT_CONFIG_FILENAME} \
                         in the working directory and user config directory)"
                    )));
                }
                None => {}
            },
        }

        let prefix = format!("{}{CONFIG_ENV_SEPARATOR}", self.env_prefix);
        figment = figment.merge(Env::prefixed(&prefix).split(CONFIG_ENV_SEPARATOR));

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;

        Ok(app_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// First existing default configuration file
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let mut candidates = vec![
            current_dir.join(DEFAULT_CONFIG_FILENAME),
            current_dir
                .join(DEFAULT_CONFIG_DIR)
                .join(DEFAULT_CONFIG_FILENAME),
        ];
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME));
        }

        candidates.into_iter().find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate application configuration
fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_server_config(config)?;
    parse_log_level(&config.logging.level)?;
    validate_cache_config(config)?;
    validate_auth_config(config)?;
    validate_discovery_config(config)?;
    Ok(())
}

fn validate_server_config(config: &AppConfig) -> Result<()> {
    if config.server.port == 0 {
        return Err(Error::configuration("Server port cannot be 0"));
    }
    if config.server.body_limit_kib == 0 {
        return Err(Error::configuration("Request body limit cannot be 0"));
    }
    Ok(())
}

fn validate_cache_config(config: &AppConfig) -> Result<()> {
    if config.cache.enabled && config.cache.default_ttl_secs == 0 {
        return Err(Error::configuration(
            "Cache TTL cannot be 0 when cache is enabled",
        ));
    }
    if config.cache.provider == CacheBackend::Redis && config.cache.redis_url.is_none() {
        return Err(Error::configuration(
            "Redis URL is required when the redis cache provider is selected",
        ));
    }
    Ok(())
}

fn validate_auth_config(config: &AppConfig) -> Result<()> {
    for (name, url) in [
        ("user_info_url", &config.auth.user_info_url),
        ("client_info_url", &config.auth.client_info_url),
    ] {
        Url::parse(url).config_context(format!("Invalid auth.{name} '{url}'"))?;
    }
    if config.auth.timeout_secs == 0 {
        return Err(Error::configuration("Introspection timeout cannot be 0"));
    }
    Ok(())
}

fn validate_discovery_config(config: &AppConfig) -> Result<()> {
    if config.discovery.enabled {
        if config.discovery.cache_ttl_secs == 0 {
            return Err(Error::configuration(
                "Discovery cache TTL cannot be 0 when discovery is enabled",
            ));
        }
        if config.discovery.max_entries == 0 {
            return Err(Error::configuration(
                "Discovery cache size cannot be 0 when discovery is enabled",
            ));
        }
    }
    Ok(())
}
