use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// Current-weather endpoint of OpenWeatherMap.
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Country-name service; answers `GET {base}/{alpha2}?lang=..`.
pub const DEFAULT_COUNTRY_URL: &str = "https://db.ig.he-arc.ch/ens/scl/ws/country";

/// Weather provider settings (endpoint + credentials).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_WEATHER_URL.to_string(), api_key: None }
    }
}

/// Country-name service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryConfig {
    pub base_url: String,
}

impl Default for CountryConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_COUNTRY_URL.to_string() }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Language hint used when none is given per call, e.g. "fr".
    pub lang: Option<String>,

    /// Path to the SQLite database. Persistence is skipped when unset.
    pub database: Option<PathBuf>,

    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub country: CountryConfig,
}

impl Config {
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
        let dirs = ProjectDirs::from("ch", "hearc", "meteo")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Returns the weather API key, if a non-empty one is configured.
    pub fn weather_api_key(&self) -> Option<&str> {
        self.weather.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }
}
