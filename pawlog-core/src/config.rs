use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::weather::OPENWEATHER_BASE_URL;

/// Weather API credentials and endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub api_key: String,

    /// Override of the public API root, mostly for proxies and tests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Document-store endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub base_url: String,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [weather]
/// api_key = "..."
///
/// [store]
/// base_url = "https://store.example.com/v1"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub weather: Option<WeatherConfig>,
    pub store: Option<StoreConfig>,
}

impl Config {
    /// Weather API key, if configured.
    pub fn weather_api_key(&self) -> Option<&str> {
        self.weather.as_ref().map(|w| w.api_key.as_str())
    }

    /// Weather API root, falling back to the public endpoint.
    pub fn weather_base_url(&self) -> &str {
        self.weather
            .as_ref()
            .and_then(|w| w.base_url.as_deref())
            .unwrap_or(OPENWEATHER_BASE_URL)
    }

    /// Document-store root, if configured.
    pub fn store_base_url(&self) -> Option<&str> {
        self.store.as_ref().map(|s| s.base_url.as_str())
    }

    /// Set/replace the weather API key, keeping any base-URL override.
    pub fn set_weather_api_key(&mut self, api_key: String) {
        match &mut self.weather {
            Some(weather) => weather.api_key = api_key,
            None => {
                self.weather = Some(WeatherConfig {
                    api_key,
                    base_url: None,
                })
            }
        }
    }

    pub fn set_store_base_url(&mut self, base_url: String) {
        self.store = Some(StoreConfig { base_url });
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "pawlog", "pawlog")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
