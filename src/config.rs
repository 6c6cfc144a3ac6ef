//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$CONTACTRANK_CONFIG` (environment variable)
//! 2. `~/.config/contactrank/config.toml` (Linux/macOS)
//!    `%APPDATA%\contactrank\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::aggregate::IngestOptions;
use crate::query::RECENT_HISTORY_LIMIT;
use crate::session::SessionOptions;
use crate::source::DEFAULT_BATCH_LIMIT;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// How message batches are read and aggregated.
    pub scan: ScanConfig,
    /// Output settings.
    pub display: DisplayConfig,
    /// Export defaults.
    pub export: ExportConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
}

/// Scan settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum number of messages read per scan.
    pub batch_limit: usize,
    /// Drop recipients whose address lacks a `local@domain.tld` shape.
    pub validate_addresses: bool,
    /// Source format when none is given: "auto", "json", "mbox".
    pub default_format: String,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// History entries shown in a contact detail view.
    pub recent_history_limit: usize,
    /// `strftime` format string for dates.
    pub date_format: String,
    /// Maximum rows in ranked lists (0 = all).
    pub top_limit: usize,
}

/// Export defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// CSV field separator character.
    pub csv_separator: char,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            log_level: "warn".to_string(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            batch_limit: DEFAULT_BATCH_LIMIT,
            validate_addresses: false,
            default_format: "auto".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            recent_history_limit: RECENT_HISTORY_LIMIT,
            date_format: "%Y-%m-%d".to_string(),
            top_limit: 0,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { csv_separator: ',' }
    }
}

impl Config {
    /// Session settings derived from this configuration.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            batch_limit: self.scan.batch_limit,
            recent_history_limit: self.display.recent_history_limit,
            ingest: IngestOptions {
                validate_addresses: self.scan.validate_addresses,
            },
        }
    }
}

// ── Load / save ─────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    if let Some(path) = config_file_path() {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Save configuration to the standard location and return where it went.
pub fn save_config(config: &Config) -> anyhow::Result<PathBuf> {
    let path = config_file_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config file path"))?;
    save_config_to(config, &path)?;
    Ok(path)
}

/// Write configuration as TOML to `path`, creating parent directories.
pub fn save_config_to(config: &Config, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    tracing::info!(path = %path.display(), "Saved config");
    Ok(())
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("CONTACTRANK_CONFIG") {
        return Some(PathBuf::from(env_path));
    }
    dirs::config_dir().map(|d| d.join("contactrank").join("config.toml"))
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("contactrank")
}

/// Return the log file path.
pub fn log_file_path(config: &Config) -> PathBuf {
    cache_dir(config).join("contactrank.log")
}
