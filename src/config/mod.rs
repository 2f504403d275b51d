//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/closest-city/config.toml
//!
//! The Google Maps key may also come from the `GOOGLE_MAPS_API_KEY`
//! environment variable, which wins over the file.

pub mod defaults;

use crate::constants::api::GOOGLE_API_KEY_ENV;
use crate::constants::geo::EARTH_RADIUS_MILES;
use crate::error::{Error, Result};
use crate::selector::{AnchorMatch, SelectorConfig};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Default values for searches
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Selector behaviour
    #[serde(default)]
    pub search: SearchConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Search history settings
    #[serde(default)]
    pub history: HistoryConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysConfig,
}

/// Default values for searches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default search radius in miles
    #[serde(default = "default_radius")]
    pub radius: f64,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,

    /// Gateway backend: "google" or "fixture"
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Fixture file used when backend is "fixture"
    #[serde(default)]
    pub fixture: String,
}

/// Selector behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Country appended to gateway queries
    #[serde(default = "default_country_hint")]
    pub country_hint: String,

    /// How candidates are compared against the anchor: "case_insensitive" or "exact"
    #[serde(default = "default_anchor_match")]
    pub anchor_match: String,

    /// Sphere radius for great-circle distances
    #[serde(default = "default_earth_radius")]
    pub earth_radius_miles: f64,

    /// Per-request gateway timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Search history settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Record successful searches
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Oldest entries are dropped beyond this count
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

/// API keys for external services
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiKeysConfig {
    /// Google Maps API key
    #[serde(default)]
    pub google: String,
}

// Default value functions for serde
fn default_radius() -> f64 {
    DEFAULT_RADIUS
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}
fn default_backend() -> String {
    DEFAULT_BACKEND.to_string()
}
fn default_country_hint() -> String {
    DEFAULT_COUNTRY_HINT.to_string()
}
fn default_anchor_match() -> String {
    DEFAULT_ANCHOR_MATCH.to_string()
}
fn default_earth_radius() -> f64 {
    EARTH_RADIUS_MILES
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_true() -> bool {
    true
}
fn default_max_entries() -> usize {
    DEFAULT_MAX_HISTORY_ENTRIES
}

fn check_earth_radius(miles: f64) -> Result<()> {
    if miles.is_finite() && miles > 0.0 {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Earth radius must be a positive finite number: {}",
            miles
        )))
    }
}

fn check_timeout(secs: u64) -> Result<()> {
    if secs == 0 {
        return Err(Error::Config("Timeout must be at least 1 second".to_string()));
    }
    Ok(())
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            format: default_format(),
            backend: default_backend(),
            fixture: String::new(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            country_hint: default_country_hint(),
            anchor_match: default_anchor_match(),
            earth_radius_miles: default_earth_radius(),
            timeout_secs: default_timeout_secs(),
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

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            max_entries: default_max_entries(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path, creating it if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["defaults", "radius"] => Some(self.defaults.radius.to_string()),
            ["defaults", "format"] => Some(self.defaults.format.clone()),
            ["defaults", "backend"] => Some(self.defaults.backend.clone()),
            ["defaults", "fixture"] => Some(self.defaults.fixture.clone()),

            ["search", "country_hint"] => Some(self.search.country_hint.clone()),
            ["search", "anchor_match"] => Some(self.search.anchor_match.clone()),
            ["search", "earth_radius_miles"] => Some(self.search.earth_radius_miles.to_string()),
            ["search", "timeout_secs"] => Some(self.search.timeout_secs.to_string()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["history", "enabled"] => Some(self.history.enabled.to_string()),
            ["history", "max_entries"] => Some(self.history.max_entries.to_string()),

            ["api_keys", "google"] => Some(self.api_keys.google.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["defaults", "radius"] => {
                let radius: f64 = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid radius value: {}", value))
                })?;
                if !(radius > 0.0 && radius.is_finite()) {
                    return Err(Error::Config(format!(
                        "Radius must be greater than 0: {}",
                        value
                    )));
                }
                self.defaults.radius = radius;
            }
            ["defaults", "format"] => {
                self.defaults.format = value.to_string();
            }
            ["defaults", "backend"] => {
                if !matches!(value, "google" | "fixture") {
                    return Err(Error::Config(format!("Unknown backend: {}", value)));
                }
                self.defaults.backend = value.to_string();
            }
            ["defaults", "fixture"] => {
                self.defaults.fixture = value.to_string();
            }

            ["search", "country_hint"] => {
                self.search.country_hint = value.to_string();
            }
            ["search", "anchor_match"] => {
                value.parse::<AnchorMatch>().map_err(Error::Config)?;
                self.search.anchor_match = value.to_string();
            }
            ["search", "earth_radius_miles"] => {
                let earth_radius: f64 = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid earth radius value: {}", value))
                })?;
                check_earth_radius(earth_radius)?;
                self.search.earth_radius_miles = earth_radius;
            }
            ["search", "timeout_secs"] => {
                let timeout: u64 = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid timeout value: {}", value))
                })?;
                check_timeout(timeout)?;
                self.search.timeout_secs = timeout;
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid port value: {}", value))
                })?;
            }

            ["history", "enabled"] => {
                self.history.enabled = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid boolean value: {}", value))
                })?;
            }
            ["history", "max_entries"] => {
                self.history.max_entries = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid max_entries value: {}", value))
                })?;
            }

            ["api_keys", "google"] => {
                self.api_keys.google = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "defaults.radius",
            "defaults.format",
            "defaults.backend",
            "defaults.fixture",
            "search.country_hint",
            "search.anchor_match",
            "search.earth_radius_miles",
            "search.timeout_secs",
            "server.host",
            "server.port",
            "history.enabled",
            "history.max_entries",
            "api_keys.google",
        ]
    }

    /// Google Maps key, preferring the environment over the config file
    pub fn google_api_key(&self) -> Option<String> {
        std::env::var(GOOGLE_API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .or_else(|| Some(self.api_keys.google.clone()).filter(|key| !key.is_empty()))
    }

    /// Build the selector settings from the `[search]` section
    pub fn selector_config(&self) -> Result<SelectorConfig> {
        let anchor_match = self
            .search
            .anchor_match
            .parse::<AnchorMatch>()
            .map_err(Error::Config)?;

        check_earth_radius(self.search.earth_radius_miles)?;

        Ok(SelectorConfig {
            earth_radius_miles: self.search.earth_radius_miles,
            country_hint: self.search.country_hint.clone(),
            anchor_match,
        })
    }

    /// Per-request gateway timeout from `search.timeout_secs`
    pub fn request_timeout(&self) -> Result<Duration> {
        check_timeout(self.search.timeout_secs)?;
        Ok(Duration::from_secs(self.search.timeout_secs))
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
