use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Clipboard storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Sensitive data handling
    #[serde(default)]
    pub security: SecurityConfig,

    /// Capture behaviour
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Service registry settings
    #[serde(default)]
    pub services: ServicesConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Storage backend type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    // @backend: Process-local map, nothing survives a restart
    Memory,
    // @backend: SQLite database file
    #[default]
    Sqlite,
}

impl StorageBackend {
    // @returns: Lowercase backend identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Memory => "memory".to_string(),
            Self::Sqlite => "sqlite".to_string(),
        }
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            _ => Err(anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

/// Clipboard storage configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    /// Which store implementation to use
    #[serde(default)]
    pub backend: StorageBackend,

    /// Database file; the platform data directory is used when unset
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Page size for history queries when the caller gives none
    #[serde(default = "default_history_limit")]
    pub default_limit: usize,

    /// Result cap for search queries when the caller gives none
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_path: None,
            default_limit: default_history_limit(),
            search_limit: default_search_limit(),
        }
    }
}

/// Sensitive data configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SecurityConfig {
    /// Content longer than this many characters is not scanned
    #[serde(default = "default_max_scan_chars")]
    pub max_scan_chars: usize,

    /// Mask sensitive content before it is written to the store
    #[serde(default)]
    pub mask_on_save: bool,

    /// Use the detector label as category for sensitive captures
    #[serde(default = "default_true")]
    pub tag_sensitive: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_scan_chars: default_max_scan_chars(),
            mask_on_save: false,
            tag_sensitive: true,
        }
    }
}

/// Capture configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CaptureConfig {
    /// Drop a capture identical to the one before it
    #[serde(default = "default_true")]
    pub skip_duplicates: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            skip_duplicates: true,
        }
    }
}

/// Service registry configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServicesConfig {
    /// Seconds between health check rounds
    #[serde(default = "default_health_check_interval_secs")]
    pub health_check_interval_secs: u64,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            health_check_interval_secs: default_health_check_interval_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to the `log` crate's filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_history_limit() -> usize {
    50
}

fn default_search_limit() -> usize {
    50
}

fn default_max_scan_chars() -> usize {
    100_000
}

fn default_health_check_interval_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

/// Default database filename
const DEFAULT_DB_FILENAME: &str = "clipkeep.db";

/// Default database directory name under user's data directory
const DEFAULT_DB_DIRNAME: &str = "clipkeep";

impl Config {
    /// Load the configuration from a JSON file, writing a default one if it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {:?}", path))?;

            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;

            return Ok(config);
        }

        warn!("Config file not found at {:?}, creating default config.", path);

        let config = Config::default();
        config.save(path)?;

        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))?;

        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.storage.default_limit == 0 {
            return Err(anyhow!("storage.default_limit must be greater than zero"));
        }

        if self.storage.search_limit == 0 {
            return Err(anyhow!("storage.search_limit must be greater than zero"));
        }

        if self.security.max_scan_chars == 0 {
            return Err(anyhow!("security.max_scan_chars must be greater than zero"));
        }

        if self.services.health_check_interval_secs == 0 {
            return Err(anyhow!(
                "services.health_check_interval_secs must be greater than zero"
            ));
        }

        if let Some(path) = &self.storage.database_path {
            if path.as_os_str().is_empty() {
                return Err(anyhow!("storage.database_path must not be empty"));
            }
        }

        Ok(())
    }
}

impl StorageConfig {
    /// Resolve the database file, falling back to the platform data directory
    pub fn resolved_database_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.database_path {
            return Ok(path.clone());
        }

        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| anyhow!("Could not determine data directory"))?;

        Ok(base_dir.join(DEFAULT_DB_DIRNAME).join(DEFAULT_DB_FILENAME))
    }
}
