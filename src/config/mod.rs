//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/city-locator/config.toml

pub mod defaults;

use crate::constants::api::{API_KEY_ENV, API_KEY_HEADER, VENDOR_BASE_URL};
use crate::constants::cookie::MAX_AGE_DAYS;
use crate::constants::location::{
    DEFAULT_CITY, DEFAULT_LAT, DEFAULT_LNG, DEFAULT_STATE, SERVICED_CITIES,
};
use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// External places/geocoding vendor
    #[serde(default)]
    pub vendor: VendorConfig,

    /// Gateway timeouts and degradation targets
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Location resolution settings
    #[serde(default)]
    pub location: LocationConfig,

    /// Search modal behaviour
    #[serde(default)]
    pub search: SearchConfig,

    /// Where CLI clients find a running gateway
    #[serde(default)]
    pub client: ClientConfig,
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

/// Vendor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorConfig {
    /// Base URL of the places/geocoding API
    #[serde(default = "default_vendor_url")]
    pub base_url: String,

    /// API key; `CITY_LOCATOR_API_KEY` takes precedence when set
    #[serde(default)]
    pub api_key: String,

    /// Header the key is sent in
    #[serde(default = "default_api_key_header")]
    pub api_key_header: String,
}

/// Gateway settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Timeout for text search, reverse geocode and photo calls
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Timeout for autocomplete, details and nearby calls
    #[serde(default = "default_autocomplete_timeout")]
    pub autocomplete_timeout_secs: u64,

    /// Timeout for IP geolocation calls
    #[serde(default = "default_ip_timeout")]
    pub ip_timeout_secs: u64,

    /// Image path photo requests redirect to on failure
    #[serde(default = "default_photo_placeholder")]
    pub photo_placeholder: String,
}

/// Location settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// City used when detection fails
    #[serde(default = "default_city")]
    pub default_city: String,

    /// State of the default city
    #[serde(default = "default_state")]
    pub default_state: String,

    /// Latitude of the default city
    #[serde(default = "default_lat")]
    pub default_lat: f64,

    /// Longitude of the default city
    #[serde(default = "default_lng")]
    pub default_lng: f64,

    /// Cities with service (case-insensitive)
    #[serde(default = "default_serviced_cities")]
    pub serviced_cities: Vec<String>,

    /// Secret used to sign the city cookie; empty leaves it unsigned
    #[serde(default)]
    pub cookie_secret: String,

    /// Cookie lifetime in days
    #[serde(default = "default_cookie_days")]
    pub cookie_days: i64,
}

/// Search modal settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Queries shorter than this never reach the network
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    /// Keystroke debounce in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Client-side timeout for autocomplete calls
    #[serde(default = "default_client_timeout")]
    pub client_timeout_secs: u64,
}

/// Client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of a running gateway
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
}

// Default value functions for serde
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_vendor_url() -> String {
    VENDOR_BASE_URL.to_string()
}
fn default_api_key_header() -> String {
    API_KEY_HEADER.to_string()
}
fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}
fn default_autocomplete_timeout() -> u64 {
    DEFAULT_AUTOCOMPLETE_TIMEOUT_SECS
}
fn default_ip_timeout() -> u64 {
    DEFAULT_IP_TIMEOUT_SECS
}
fn default_photo_placeholder() -> String {
    DEFAULT_PHOTO_PLACEHOLDER.to_string()
}
fn default_city() -> String {
    DEFAULT_CITY.to_string()
}
fn default_state() -> String {
    DEFAULT_STATE.to_string()
}
fn default_lat() -> f64 {
    DEFAULT_LAT
}
fn default_lng() -> f64 {
    DEFAULT_LNG
}
fn default_serviced_cities() -> Vec<String> {
    SERVICED_CITIES.iter().map(|c| c.to_string()).collect()
}
fn default_cookie_days() -> i64 {
    MAX_AGE_DAYS
}
fn default_min_query_len() -> usize {
    DEFAULT_MIN_QUERY_LEN
}
fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}
fn default_client_timeout() -> u64 {
    DEFAULT_CLIENT_TIMEOUT_SECS
}
fn default_gateway_url() -> String {
    format!("http://{}:{}", DEFAULT_HOST, DEFAULT_PORT)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            base_url: default_vendor_url(),
            api_key: String::new(),
            api_key_header: default_api_key_header(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            autocomplete_timeout_secs: default_autocomplete_timeout(),
            ip_timeout_secs: default_ip_timeout(),
            photo_placeholder: default_photo_placeholder(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            default_city: default_city(),
            default_state: default_state(),
            default_lat: default_lat(),
            default_lng: default_lng(),
            serviced_cities: default_serviced_cities(),
            cookie_secret: String::new(),
            cookie_days: default_cookie_days(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: default_min_query_len(),
            debounce_ms: default_debounce_ms(),
            client_timeout_secs: default_client_timeout(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            gateway_url: default_gateway_url(),
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

    /// Load configuration from a specific file, creating it when missing
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

    /// Save configuration to a specific file
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

    /// Vendor API key, preferring the environment over the file
    pub fn vendor_api_key(&self) -> String {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => key,
            _ => self.vendor.api_key.clone(),
        }
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["vendor", "base_url"] => Some(self.vendor.base_url.clone()),
            ["vendor", "api_key"] => Some(self.vendor.api_key.clone()),
            ["vendor", "api_key_header"] => Some(self.vendor.api_key_header.clone()),

            ["gateway", "request_timeout_secs"] => {
                Some(self.gateway.request_timeout_secs.to_string())
            }
            ["gateway", "autocomplete_timeout_secs"] => {
                Some(self.gateway.autocomplete_timeout_secs.to_string())
            }
            ["gateway", "ip_timeout_secs"] => Some(self.gateway.ip_timeout_secs.to_string()),
            ["gateway", "photo_placeholder"] => Some(self.gateway.photo_placeholder.clone()),

            ["location", "default_city"] => Some(self.location.default_city.clone()),
            ["location", "default_state"] => Some(self.location.default_state.clone()),
            ["location", "default_lat"] => Some(self.location.default_lat.to_string()),
            ["location", "default_lng"] => Some(self.location.default_lng.to_string()),
            ["location", "serviced_cities"] => Some(self.location.serviced_cities.join(",")),
            ["location", "cookie_secret"] => Some(self.location.cookie_secret.clone()),
            ["location", "cookie_days"] => Some(self.location.cookie_days.to_string()),

            ["search", "min_query_len"] => Some(self.search.min_query_len.to_string()),
            ["search", "debounce_ms"] => Some(self.search.debounce_ms.to_string()),
            ["search", "client_timeout_secs"] => {
                Some(self.search.client_timeout_secs.to_string())
            }

            ["client", "gateway_url"] => Some(self.client.gateway_url.clone()),

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
            ["server", "host"] => self.server.host = value.to_string(),
            ["server", "port"] => self.server.port = parse_value(key, value)?,

            ["vendor", "base_url"] => self.vendor.base_url = value.to_string(),
            ["vendor", "api_key"] => self.vendor.api_key = value.to_string(),
            ["vendor", "api_key_header"] => self.vendor.api_key_header = value.to_string(),

            ["gateway", "request_timeout_secs"] => {
                self.gateway.request_timeout_secs = parse_value(key, value)?;
            }
            ["gateway", "autocomplete_timeout_secs"] => {
                self.gateway.autocomplete_timeout_secs = parse_value(key, value)?;
            }
            ["gateway", "ip_timeout_secs"] => {
                self.gateway.ip_timeout_secs = parse_value(key, value)?;
            }
            ["gateway", "photo_placeholder"] => {
                self.gateway.photo_placeholder = value.to_string();
            }

            ["location", "default_city"] => self.location.default_city = value.to_string(),
            ["location", "default_state"] => self.location.default_state = value.to_string(),
            ["location", "default_lat"] => self.location.default_lat = parse_value(key, value)?,
            ["location", "default_lng"] => self.location.default_lng = parse_value(key, value)?,
            ["location", "serviced_cities"] => {
                self.location.serviced_cities = value
                    .split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_lowercase)
                    .collect();
            }
            ["location", "cookie_secret"] => self.location.cookie_secret = value.to_string(),
            ["location", "cookie_days"] => self.location.cookie_days = parse_value(key, value)?,

            ["search", "min_query_len"] => self.search.min_query_len = parse_value(key, value)?,
            ["search", "debounce_ms"] => self.search.debounce_ms = parse_value(key, value)?,
            ["search", "client_timeout_secs"] => {
                self.search.client_timeout_secs = parse_value(key, value)?;
            }

            ["client", "gateway_url"] => self.client.gateway_url = value.to_string(),

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "server.host",
            "server.port",
            "vendor.base_url",
            "vendor.api_key",
            "vendor.api_key_header",
            "gateway.request_timeout_secs",
            "gateway.autocomplete_timeout_secs",
            "gateway.ip_timeout_secs",
            "gateway.photo_placeholder",
            "location.default_city",
            "location.default_state",
            "location.default_lat",
            "location.default_lng",
            "location.serviced_cities",
            "location.cookie_secret",
            "location.cookie_days",
            "search.min_query_len",
            "search.debounce_ms",
            "search.client_timeout_secs",
            "client.gateway_url",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.port, 7878);
        assert_eq!(config.gateway.ip_timeout_secs, 5);
        assert_eq!(config.gateway.autocomplete_timeout_secs, 8);
        assert_eq!(config.location.default_city, "Indore");
        assert_eq!(config.location.serviced_cities.len(), 10);
        assert_eq!(config.location.cookie_days, 30);
        assert_eq!(config.search.min_query_len, 2);
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("location.default_city"), Some("Indore".to_string()));

        config.set("server.port", "9000").unwrap();
        assert_eq!(config.server.port, 9000);

        config.set("location.serviced_cities", "Pune, Goa ,").unwrap();
        assert_eq!(config.location.serviced_cities, vec!["pune", "goa"]);
        assert_eq!(config.get("location.serviced_cities"), Some("pune,goa".to_string()));
    }

    #[test]
    fn test_get_invalid_key() {
        let config = Config::default();
        assert_eq!(config.get("invalid.key"), None);
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
    }

    #[test]
    fn test_set_invalid_value() {
        let mut config = Config::default();
        assert!(config.set("gateway.ip_timeout_secs", "soon").is_err());
    }

    #[test]
    fn test_every_available_key_is_readable() {
        let config = Config::default();
        for key in Config::available_keys() {
            assert!(config.get(key).is_some(), "unreadable key {}", key);
        }
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.vendor.base_url = "http://localhost:9999".to_string();
        config.location.cookie_secret = "s3cret".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.vendor.base_url, "http://localhost:9999");
        assert_eq!(loaded.location.cookie_secret, "s3cret");
    }

    #[test]
    fn test_load_creates_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let loaded = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(loaded.server.port, 7878);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let loaded: Config = toml::from_str("[server]\nport = 8080\n").unwrap();
        assert_eq!(loaded.server.port, 8080);
        assert_eq!(loaded.server.host, "127.0.0.1");
        assert_eq!(loaded.gateway.request_timeout_secs, 5);
    }

    #[test]
    fn test_serialization_format() {
        let toml = toml::to_string_pretty(&Config::default()).unwrap();

        assert!(toml.contains("[server]"));
        assert!(toml.contains("[vendor]"));
        assert!(toml.contains("[location]"));
        assert!(toml.contains("[search]"));
    }

    #[test]
    fn test_server_addr() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "127.0.0.1:7878");
        assert_eq!(config.client.gateway_url, "http://127.0.0.1:7878");
    }
}
