//! Configuration management for the weather dashboard
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::DashboardError;
use crate::provider::ApiKey;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable the provider key was historically read from
pub const LEGACY_API_KEY_VAR: &str = "OPENWEATHERMAP_API_KEY";

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_VAR: &str = "WEATHER_DASHBOARD_CONFIG";

/// Root configuration structure for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DashboardConfig {
    /// Weather provider settings
    #[serde(default)]
    pub provider: ProviderConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Terminal dashboard settings
    #[serde(default)]
    pub dashboard: ClientConfig,
}

/// OpenWeatherMap configuration settings
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider API key
    pub api_key: Option<String>,
    /// Base URL of the geocoding API
    #[serde(default = "default_geo_base_url")]
    pub geo_base_url: String,
    /// Base URL of the current weather and forecast API
    #[serde(default = "default_data_base_url")]
    pub data_base_url: String,
    /// Unit system the provider converts into (imperial, metric, standard)
    #[serde(default = "default_units")]
    pub units: String,
    /// Country postal codes and name searches are restricted to
    #[serde(default = "default_country_code")]
    pub country_code: String,
    /// Request timeout in seconds
    #[serde(default = "default_provider_timeout")]
    pub timeout_seconds: u32,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory the dashboard page is served from
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Upper bound on the time spent answering one request
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u32,
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

/// Settings for the terminal dashboard client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of a running dashboard server's API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Location query shown on start-up
    #[serde(default = "default_location")]
    pub default_location: String,
    /// City name shown for the start-up location
    #[serde(default = "default_city")]
    pub default_city: String,
    /// Quiet period before a search is sent
    #[serde(default = "default_debounce_millis")]
    pub debounce_millis: u64,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// Default value functions
fn default_geo_base_url() -> String {
    "https://api.openweathermap.org/geo/1.0".to_string()
}

fn default_data_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_units() -> String {
    "imperial".to_string()
}

fn default_country_code() -> String {
    "US".to_string()
}

fn default_provider_timeout() -> u32 {
    10
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> String {
    "frontend".to_string()
}

fn default_request_timeout() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_api_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_location() -> String {
    "95125".to_string()
}

fn default_city() -> String {
    "San Jose".to_string()
}

fn default_debounce_millis() -> u64 {
    300
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            geo_base_url: default_geo_base_url(),
            data_base_url: default_data_base_url(),
            units: default_units(),
            country_code: default_country_code(),
            timeout_seconds: default_provider_timeout(),
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("geo_base_url", &self.geo_base_url)
            .field("data_base_url", &self.data_base_url)
            .field("units", &self.units)
            .field("country_code", &self.country_code)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl ProviderConfig {
    /// The configured credential, if any
    #[must_use]
    pub fn api_key(&self) -> Option<ApiKey> {
        non_blank(self.api_key.clone()).map(ApiKey::new)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
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

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            default_location: default_location(),
            default_city: default_city(),
            debounce_millis: default_debounce_millis(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from file and environment variables
    ///
    /// `WEATHER_DASHBOARD_CONFIG` names the file explicitly; otherwise the
    /// per-user config directory is used.
    pub fn load() -> Result<Self> {
        Self::load_from_path(std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from))
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // WEATHER_DASHBOARD__SERVER__PORT=8080 and friends
        builder = builder.add_source(
            Environment::with_prefix("WEATHER_DASHBOARD")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: DashboardConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // a blank key counts as missing so each request fails, not start-up
        config.provider.api_key = non_blank(config.provider.api_key.take())
            .or_else(|| non_blank(std::env::var(LEGACY_API_KEY_VAR).ok()));

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("weather-dashboard").join("config.toml"))
    }

    /// Apply default values to fields left blank
    pub fn apply_defaults(&mut self) {
        if self.provider.geo_base_url.is_empty() {
            self.provider.geo_base_url = default_geo_base_url();
        }
        if self.provider.data_base_url.is_empty() {
            self.provider.data_base_url = default_data_base_url();
        }
        if self.provider.units.is_empty() {
            self.provider.units = default_units();
        }
        if self.provider.country_code.is_empty() {
            self.provider.country_code = default_country_code();
        }
        if self.provider.timeout_seconds == 0 {
            self.provider.timeout_seconds = default_provider_timeout();
        }
        if self.server.static_dir.is_empty() {
            self.server.static_dir = default_static_dir();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.dashboard.debounce_millis == 0 {
            self.dashboard.debounce_millis = default_debounce_millis();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.provider.timeout_seconds > 120 {
            return Err(
                DashboardError::config("Provider timeout cannot exceed 120 seconds").into(),
            );
        }

        if self.server.request_timeout_seconds > 300 {
            return Err(
                DashboardError::config("Request timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.dashboard.debounce_millis > 5000 {
            return Err(
                DashboardError::config("Debounce delay cannot exceed 5000 ms").into(),
            );
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(DashboardError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(DashboardError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let valid_units = ["imperial", "metric", "standard"];
        if !valid_units.contains(&self.provider.units.as_str()) {
            return Err(DashboardError::config(format!(
                "Invalid units '{}'. Must be one of: {}",
                self.provider.units,
                valid_units.join(", ")
            ))
            .into());
        }

        for url in [
            &self.provider.geo_base_url,
            &self.provider.data_base_url,
            &self.dashboard.api_base_url,
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(DashboardError::config(format!(
                    "Base URL '{url}' must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
