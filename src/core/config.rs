use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use tracing::debug;

/// Environment variable that overrides the feed API key from the file.
pub const API_KEY_ENV: &str = "CRYPTEX_AIO_KEY";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CoinGeckoProviderConfig {
    pub base_url: String,
}

impl Default for CoinGeckoProviderConfig {
    fn default() -> Self {
        CoinGeckoProviderConfig {
            base_url: "https://api.coingecko.com/api/v3".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AdafruitProviderConfig {
    #[serde(default = "default_adafruit_url")]
    pub base_url: String,
    pub username: String,
    #[serde(default = "default_feed_key")]
    pub feed_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_adafruit_url() -> String {
    "https://io.adafruit.com/api/v2".to_string()
}

fn default_feed_key() -> String {
    "purchase-data".to_string()
}

impl AdafruitProviderConfig {
    /// API key from the environment, falling back to the config file.
    pub fn resolve_api_key(&self) -> Result<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
            .with_context(|| {
                format!("No feed API key configured: set providers.adafruit.api_key or {API_KEY_ENV}")
            })
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub coingecko: CoinGeckoProviderConfig,
    pub adafruit: Option<AdafruitProviderConfig>,
}

fn default_currency() -> String {
    "gbp".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_debounce_ms() -> u64 {
    500
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            currency: default_currency(),
            timeout_secs: default_timeout_secs(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "cryptex", "cryptex")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn adafruit(&self) -> Result<&AdafruitProviderConfig> {
        self.providers
            .adafruit
            .as_ref()
            .context("No data store configured: add a providers.adafruit section")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  coingecko:
    base_url: "http://example.com/coingecko"
  adafruit:
    base_url: "http://example.com/adafruit"
    username: "alice"
    feed_key: "purchases"
    api_key: "aio_test"
currency: "EUR"
timeout_secs: 3
debounce_ms: 250
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(
            config.providers.coingecko.base_url,
            "http://example.com/coingecko"
        );
        let adafruit = config.adafruit().unwrap();
        assert_eq!(adafruit.base_url, "http://example.com/adafruit");
        assert_eq!(adafruit.username, "alice");
        assert_eq!(adafruit.feed_key, "purchases");
        assert_eq!(adafruit.api_key.as_deref(), Some("aio_test"));
        assert_eq!(config.currency, "EUR");
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(config.debounce_window(), Duration::from_millis(250));
    }

    #[test]
    fn test_config_defaults() {
        let yaml_str = r#"
providers:
  adafruit:
    username: "alice"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).unwrap();
        assert_eq!(
            config.providers.coingecko.base_url,
            "https://api.coingecko.com/api/v3"
        );
        let adafruit = config.adafruit().unwrap();
        assert_eq!(adafruit.base_url, "https://io.adafruit.com/api/v2");
        assert_eq!(adafruit.feed_key, "purchase-data");
        assert!(adafruit.api_key.is_none());
        assert_eq!(config.currency, "gbp");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.debounce_ms, 500);
    }

    #[test]
    fn test_missing_store_section() {
        let config = AppConfig::default();
        let err = config.adafruit().unwrap_err();
        assert!(err.to_string().contains("providers.adafruit"));
    }
}
