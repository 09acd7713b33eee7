//! Configuration loading and validation.
//!
//! Precedence is environment, then the TOML file, then built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::fetch::{ClientConfig, DEFAULT_BASE_URL};

/// Value written by `init-config` that must be replaced before use.
pub const API_KEY_PLACEHOLDER: &str = "your_faceit_api_key_here";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("FACEIT API key is not set (set FACEIT_API_KEY or api.api_key in the config file)")]
    MissingApiKey,

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// FACEIT API access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Game id used for history and lifetime lookups
    #[serde(default = "default_game")]
    pub game: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_game() -> String {
    "cs2".to_string()
}

fn default_timeout() -> u64 {
    15
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            game: default_game(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Response cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: u64,

    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

fn default_true() -> bool {
    true
}

fn default_ttl_minutes() -> u64 {
    30
}

fn default_sweep_interval() -> u64 {
    300
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_minutes: default_ttl_minutes(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_minutes.saturating_mul(60))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }
}

/// What the reports show by default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub default_player: String,

    #[serde(default = "default_matches_per_page")]
    pub matches_per_page: usize,

    #[serde(default = "default_max_matches")]
    pub max_matches_to_load: usize,

    #[serde(default = "default_comparison_matches")]
    pub comparison_matches: usize,
}

fn default_matches_per_page() -> usize {
    10
}

fn default_max_matches() -> usize {
    100
}

fn default_comparison_matches() -> usize {
    20
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_player: String::new(),
            matches_per_page: default_matches_per_page(),
            max_matches_to_load: default_max_matches(),
            comparison_matches: default_comparison_matches(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub json_logs: bool,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
            api: ApiConfig::default(),
            cache: CacheConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Read the file if it exists, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Default location: `$XDG_CONFIG_HOME/faceit-stats/config.toml`, falling
    /// back to `$HOME/.config/faceit-stats/config.toml`.
    pub fn default_path() -> PathBuf {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME")
                    .filter(|v| !v.is_empty())
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("faceit-stats").join("config.toml")
    }

    /// Override fields from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Override fields from `lookup`. Empty values are ignored, as are numbers
    /// that do not parse or are not positive.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let positive = |key: &str| {
            get(key)
                .and_then(|v| v.trim().parse::<i64>().ok())
                .filter(|n| *n > 0)
        };

        if let Some(key) = get("FACEIT_API_KEY") {
            self.api.api_key = key;
        }
        if let Some(player) = get("FACEIT_DEFAULT_PLAYER") {
            self.display.default_player = player;
        }
        if let Some(level) = get("LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(enabled) = get("CACHE_ENABLED") {
            self.cache.enabled = enabled.trim() == "true";
        }
        if let Some(ttl) = positive("CACHE_TTL") {
            self.cache.ttl_minutes = ttl as u64;
        }
        if let Some(per_page) = positive("MATCHES_PER_PAGE") {
            self.display.matches_per_page = per_page as usize;
        }
        if let Some(max) = positive("MAX_MATCHES_TO_LOAD") {
            self.display.max_matches_to_load = max as usize;
        }
        if let Some(count) = positive("COMPARISON_MATCHES") {
            self.display.comparison_matches = count as usize;
        }
        if let Some(production) = get("PRODUCTION_MODE") {
            self.json_logs = production.trim() == "true";
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let key = self.api.api_key.trim();
        if key.is_empty() || key == API_KEY_PLACEHOLDER {
            return Err(ConfigError::MissingApiKey);
        }

        if Url::parse(&self.api.base_url).is_err() {
            return Err(ConfigError::ValidationError(format!(
                "API base URL is not a valid URL: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "API timeout must be greater than 0".to_string(),
            ));
        }

        if self.display.matches_per_page == 0 {
            return Err(ConfigError::ValidationError(
                "Matches per page must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// HTTP client settings derived from the `[api]` section.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api.base_url.clone(),
            api_key: self.api.api_key.clone(),
            timeout: Duration::from_secs(self.api.timeout_seconds),
            ..Default::default()
        }
    }

    /// Write a starter config file. Refuses to replace an existing file
    /// unless `force` is set.
    pub fn write_default(path: &Path, force: bool) -> Result<(), ConfigError> {
        if path.exists() && !force {
            return Err(ConfigError::ValidationError(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }

        let mut config = AppConfig::default();
        config.api.api_key = API_KEY_PLACEHOLDER.to_string();
        let body = toml::to_string_pretty(&config)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let header = "# faceit-stats configuration\n\
                      # Environment variables (FACEIT_API_KEY, CACHE_TTL, ...) override these values.\n\n";
        std::fs::write(path, format!("{}{}", header, body))?;
        Ok(())
    }
}
