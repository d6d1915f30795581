//! Configuration loading, validation, and management for dealerbot.
//!
//! Loads configuration from `~/.dealerbot/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The root configuration structure.
///
/// Maps directly to `~/.dealerbot/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Spreadsheet, report cache and matching policy
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Conversation state retention and persistence
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Image and price-list directories
    #[serde(default)]
    pub assets: AssetsConfig,

    /// Persona and promotional text
    #[serde(default)]
    pub assistant: AssistantConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON workbook exported from the dealer spreadsheet
    #[serde(default = "default_workbook")]
    pub workbook: PathBuf,

    /// How long a rendered report stays fresh
    #[serde(default = "default_cache_expiry")]
    pub cache_expiry_minutes: u64,

    /// A resolution is accepted only above this score
    #[serde(default = "default_min_score")]
    pub min_score: f64,

    /// Score granted when one normalized name contains the other
    #[serde(default = "default_containment_floor")]
    pub containment_floor: f64,

    /// Tenors advertised when no sheet declares any
    #[serde(default = "default_fallback_tenors")]
    pub fallback_tenors: Vec<u32>,
}

fn default_workbook() -> PathBuf {
    AppConfig::config_dir().join("workbook.json")
}
fn default_cache_expiry() -> u64 {
    30
}
fn default_min_score() -> f64 {
    0.4
}
fn default_containment_floor() -> f64 {
    0.8
}
fn default_fallback_tenors() -> Vec<u32> {
    vec![11]
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            workbook: default_workbook(),
            cache_expiry_minutes: default_cache_expiry(),
            min_score: default_min_score(),
            containment_floor: default_containment_floor(),
            fallback_tenors: default_fallback_tenors(),
        }
    }
}

impl CatalogConfig {
    pub fn cache_expiry(&self) -> Duration {
        minutes(self.cache_expiry_minutes)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Directory holding the topic and greeting snapshots
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Turns older than this are dropped from history
    #[serde(default = "default_window")]
    pub history_window_minutes: u64,

    /// Most recent turns kept per customer
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// A remembered topic is injected only while younger than this
    #[serde(default = "default_window")]
    pub topic_window_minutes: u64,
}

fn default_data_dir() -> PathBuf {
    AppConfig::config_dir().join("data")
}
fn default_window() -> u64 {
    60
}
fn default_max_history() -> usize {
    20
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            history_window_minutes: default_window(),
            max_history: default_max_history(),
            topic_window_minutes: default_window(),
        }
    }
}

impl MemoryConfig {
    pub fn history_window(&self) -> Duration {
        minutes(self.history_window_minutes)
    }

    pub fn topic_window(&self) -> Duration {
        minutes(self.topic_window_minutes)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// One sub-directory per model, holding colour photos
    #[serde(default = "default_motors_dir")]
    pub motors_dir: PathBuf,

    /// One image per model with its price list
    #[serde(default = "default_price_lists_dir")]
    pub price_lists_dir: PathBuf,

    /// Pause between consecutive colour images
    #[serde(default = "default_attachment_delay")]
    pub attachment_delay_ms: u64,
}

fn default_motors_dir() -> PathBuf {
    AppConfig::config_dir().join("images").join("motors")
}
fn default_price_lists_dir() -> PathBuf {
    AppConfig::config_dir().join("images").join("informasi-tambahan")
}
fn default_attachment_delay() -> u64 {
    500
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            motors_dir: default_motors_dir(),
            price_lists_dir: default_price_lists_dir(),
            attachment_delay_ms: default_attachment_delay(),
        }
    }
}

impl AssetsConfig {
    /// Point both asset directories below a common root.
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            motors_dir: root.join("motors"),
            price_lists_dir: root.join("informasi-tambahan"),
            attachment_delay_ms: default_attachment_delay(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_persona")]
    pub persona_name: String,

    #[serde(default = "default_dealer")]
    pub dealer_name: String,

    /// Promotion block appended to the system prompt
    #[serde(default = "default_promo")]
    pub promo: String,
}

fn default_persona() -> String {
    "Lucky".into()
}
fn default_dealer() -> String {
    "NSS Honda Cibadak".into()
}
fn default_promo() -> String {
    "POTONGAN TENOR ALL UNIT:\n\
     - Angsuran 23 bulan: potongan 1 bulan (bayar hanya 22 bulan)\n\
     - Angsuran 29 bulan: potongan 2 bulan (bayar hanya 27 bulan)\n\
     - Angsuran 35 bulan: potongan 2 bulan (bayar hanya 33 bulan)\n\n\
     DP minimal: 10 - 15% dari harga OTR"
        .into()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            persona_name: default_persona(),
            dealer_name: default_dealer(),
            promo: default_promo(),
        }
    }
}

fn minutes(m: u64) -> Duration {
    Duration::from_secs(m * 60)
}

impl AppConfig {
    /// Load configuration from the default path (~/.dealerbot/config.toml).
    ///
    /// Environment variables override file values:
    /// - `DEALERBOT_DATA_DIR`
    /// - `DEALERBOT_ASSETS_DIR` (root holding `motors/` and `informasi-tambahan/`)
    /// - `DEALERBOT_WORKBOOK`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("DEALERBOT_DATA_DIR") {
            self.memory.data_dir = PathBuf::from(dir);
        }
        if let Some(root) = lookup("DEALERBOT_ASSETS_DIR") {
            let delay = self.assets.attachment_delay_ms;
            self.assets = AssetsConfig::rooted_at(Path::new(&root));
            self.assets.attachment_delay_ms = delay;
        }
        if let Some(workbook) = lookup("DEALERBOT_WORKBOOK") {
            self.catalog.workbook = PathBuf::from(workbook);
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".dealerbot")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.catalog;
        if !(0.0..=1.0).contains(&c.min_score) {
            return Err(ConfigError::ValidationError(
                "catalog.min_score must be between 0.0 and 1.0".into(),
            ));
        }
        if c.containment_floor < c.min_score || c.containment_floor > 1.0 {
            return Err(ConfigError::ValidationError(
                "catalog.containment_floor must lie between min_score and 1.0".into(),
            ));
        }
        if c.cache_expiry_minutes == 0 {
            return Err(ConfigError::ValidationError(
                "catalog.cache_expiry_minutes must be > 0".into(),
            ));
        }

        let m = &self.memory;
        if m.max_history == 0 {
            return Err(ConfigError::ValidationError(
                "memory.max_history must be > 0".into(),
            ));
        }
        if m.history_window_minutes == 0 || m.topic_window_minutes == 0 {
            return Err(ConfigError::ValidationError(
                "memory windows must be > 0 minutes".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
