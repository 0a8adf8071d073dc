//! Configuration management for Folio
//!
//! Supports environment variables, config files, and runtime overrides.
//!
//! Config file location: ~/.config/folio/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{FolioError, Result};

/// Main configuration for Folio
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where portfolios and strategies are persisted
    #[serde(default)]
    pub storage: StorageConfig,
    /// Closing price data
    #[serde(default)]
    pub prices: PriceConfig,
}

/// Persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory holding `portfolios/` and `strategies/`
    pub data_dir: PathBuf,
}

/// Price book configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceConfig {
    /// JSON price book; defaults to `<data_dir>/prices.json`
    pub file: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: env::var("FOLIO_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    dirs::data_dir()
                        .unwrap_or_else(|| PathBuf::from("."))
                        .join("folio")
                }),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("folio")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load() -> Self {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        let mut config = Self::load_from_file().unwrap_or_default();
        config.apply_env();
        config
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(FolioError::config("Config file not found"));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| FolioError::config(format!("Failed to read config: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| FolioError::config(format!("Failed to parse config: {}", e)))
    }

    /// Environment variables win over the config file
    fn apply_env(&mut self) {
        if let Ok(dir) = env::var("FOLIO_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Ok(file) = env::var("FOLIO_PRICE_FILE") {
            self.prices.file = Some(PathBuf::from(file));
        }
    }

    /// Save configuration to the default config file and return its path
    pub fn save_and_get_path(&self) -> Result<PathBuf> {
        let config_path = Self::config_file();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save configuration to `path`, creating its directory
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(config_dir) = path.parent() {
            fs::create_dir_all(config_dir)
                .map_err(|e| FolioError::config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| FolioError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| FolioError::config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Directory holding saved portfolios
    pub fn portfolio_dir(&self) -> PathBuf {
        self.storage.data_dir.join("portfolios")
    }

    /// Directory holding saved strategies
    pub fn strategy_dir(&self) -> PathBuf {
        self.storage.data_dir.join("strategies")
    }

    /// Resolved price book location
    pub fn price_file(&self) -> PathBuf {
        self.prices
            .file
            .clone()
            .unwrap_or_else(|| self.storage.data_dir.join("prices.json"))
    }

    /// Generate a default config file content for display
    pub fn default_config_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config)
            .unwrap_or_else(|_| String::from("# Error generating config"))
    }
}
