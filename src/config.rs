//! Configuration management for the Geoapify gateway
//!
//! Handles loading configuration from files and environment variables,
//! validates it, and exposes settings to the gateways by name through
//! [`ConfigProvider`].

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::{GeoapifyError, Result};

/// Setting holding the routing API key
pub const ROUTING_KEY_SETTING: &str = "geoapify_api_key";
/// Setting holding the autocomplete API key
pub const AUTOCOMPLETE_KEY_SETTING: &str = "geoapify_key";
/// Setting holding the provider base URL
pub const BASE_URL_SETTING: &str = "geoapify_base_url";

/// Read-only access to process-wide settings by name
pub trait ConfigProvider {
    fn get_value(&self, name: &str) -> Option<String>;

    /// Provider base URL without a trailing slash
    fn base_url(&self) -> String {
        self.get_value(BASE_URL_SETTING)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(default_base_url)
    }
}

impl<P: ConfigProvider + ?Sized> ConfigProvider for &P {
    fn get_value(&self, name: &str) -> Option<String> {
        (**self).get_value(name)
    }
}

impl<P: ConfigProvider + ?Sized> ConfigProvider for Arc<P> {
    fn get_value(&self, name: &str) -> Option<String> {
        (**self).get_value(name)
    }
}

impl ConfigProvider for HashMap<String, String> {
    fn get_value(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeoapifyConfig {
    /// Geoapify API settings
    #[serde(default)]
    pub provider: ProviderConfig,
    /// HTTP host settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Geoapify API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Key used by the routing endpoints
    pub api_key: Option<String>,
    /// Key used by address autocomplete
    pub autocomplete_key: Option<String>,
    /// Base URL for the Geoapify API
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// HTTP host settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_base_url() -> String {
    "https://api.geoapify.com/v1".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            autocomplete_key: None,
            base_url: default_base_url(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl GeoapifyConfig {
    /// Load configuration from the given path, or the default location,
    /// overlaid with environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // GEOAPIFY_PROVIDER__API_KEY -> provider.api_key
        builder = builder.add_source(
            Environment::with_prefix("GEOAPIFY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| GeoapifyError::config(format!("Failed to build configuration: {e}")))?;

        let mut config: GeoapifyConfig = settings.try_deserialize().map_err(|e| {
            GeoapifyError::config(format!("Failed to deserialize configuration: {e}"))
        })?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("geoapify").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.provider.base_url.trim().is_empty() {
            self.provider.base_url = default_base_url();
        }
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Keys are optional, but a configured key must not be blank
    pub fn validate_api_keys(&self) -> Result<()> {
        let keys = [
            ("provider.api_key", &self.provider.api_key),
            ("provider.autocomplete_key", &self.provider.autocomplete_key),
        ];
        for (name, key) in keys {
            if key.as_deref().is_some_and(|k| k.trim().is_empty()) {
                return Err(GeoapifyError::config(format!(
                    "{name} cannot be empty if provided. Either remove it or provide a valid key."
                )));
            }
        }
        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(GeoapifyError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(GeoapifyError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        let base_url = &self.provider.base_url;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(GeoapifyError::config(
                "Geoapify base URL must be a valid HTTP or HTTPS URL",
            ));
        }

        Ok(())
    }
}

impl ConfigProvider for GeoapifyConfig {
    fn get_value(&self, name: &str) -> Option<String> {
        match name {
            ROUTING_KEY_SETTING => self.provider.api_key.clone(),
            AUTOCOMPLETE_KEY_SETTING => self.provider.autocomplete_key.clone(),
            BASE_URL_SETTING => Some(self.provider.base_url.clone()),
            _ => None,
        }
    }
}
