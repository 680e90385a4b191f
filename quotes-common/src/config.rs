//! Configuration loading and root folder resolution
//!
//! Bootstrap settings come from a TOML file. Individual values resolve in
//! this order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::dedup::{Deduplicator, DEFAULT_FUZZY_THRESHOLD, DEFAULT_SOURCE_CAPACITY};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "QUOTES_CONFIG";
/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV_VAR: &str = "QUOTES_ROOT_FOLDER";
/// Environment variable overriding the listen port
pub const PORT_ENV_VAR: &str = "QUOTES_PORT";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "quotes.db";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the database file
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub selection: SelectionConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); RUST_LOG wins when set
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Tuning for submission checks and listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Similarity score (0-100) above which a submission needs confirmation
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: u8,

    /// Maximum quotes per source
    #[serde(default = "default_source_capacity")]
    pub source_capacity: i64,

    /// Number of entries returned by the top listing
    #[serde(default = "default_top_limit")]
    pub top_limit: i64,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5740
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_fuzzy_threshold() -> u8 {
    DEFAULT_FUZZY_THRESHOLD
}

fn default_source_capacity() -> i64 {
    DEFAULT_SOURCE_CAPACITY
}

fn default_top_limit() -> i64 {
    10
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            bind_address: default_bind_address(),
            port: default_port(),
            logging: LoggingConfig::default(),
            selection: SelectionConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: default_fuzzy_threshold(),
            source_capacity: default_source_capacity(),
            top_limit: default_top_limit(),
        }
    }
}

impl TomlConfig {
    /// Read and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        let config: TomlConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.selection.fuzzy_threshold > 100 {
            return Err(Error::Config(format!(
                "selection.fuzzy_threshold must be between 0 and 100, got {}",
                self.selection.fuzzy_threshold
            )));
        }
        if self.selection.source_capacity < 1 {
            return Err(Error::Config(format!(
                "selection.source_capacity must be at least 1, got {}",
                self.selection.source_capacity
            )));
        }
        if self.selection.top_limit < 1 {
            return Err(Error::Config(format!(
                "selection.top_limit must be at least 1, got {}",
                self.selection.top_limit
            )));
        }
        Ok(())
    }

    /// Deduplicator configured from the `[selection]` table
    pub fn deduplicator(&self) -> Deduplicator {
        Deduplicator::new(
            self.selection.fuzzy_threshold,
            self.selection.source_capacity,
        )
    }
}

/// Load the bootstrap config
///
/// An explicitly named file (argument or `QUOTES_CONFIG`) must exist. When
/// nothing is named, the platform config locations are probed and compiled
/// defaults are used if none is present.
pub fn load_config(cli_path: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = cli_path {
        return TomlConfig::load(path);
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return TomlConfig::load(Path::new(&path));
    }

    match default_config_file() {
        Some(path) => TomlConfig::load(&path),
        None => {
            debug!("No config file found, using compiled defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// First existing config file among the platform locations
fn default_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("quotes").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/quotes/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Resolve the root folder (CLI → env → TOML → OS default)
pub fn resolve_root_folder(
    cli_arg: Option<&str>,
    env_var_name: &str,
    config: &TomlConfig,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    get_default_root_folder()
}

/// Resolve the listen port (CLI → env → TOML/default)
pub fn resolve_port(cli_arg: Option<u16>, env_var_name: &str, config: &TomlConfig) -> Result<u16> {
    if let Some(port) = cli_arg {
        return Ok(port);
    }

    if let Ok(value) = std::env::var(env_var_name) {
        return value.trim().parse::<u16>().map_err(|_| {
            Error::Config(format!("{} is not a valid port: {:?}", env_var_name, value))
        });
    }

    Ok(config.port)
}

/// Database file location for a root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join(DATABASE_FILE_NAME)
}

/// OS-dependent default root folder path
fn get_default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/quotes (or /var/lib/quotes for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("quotes"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/quotes"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("quotes"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/quotes"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("quotes"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\quotes"))
    } else {
        PathBuf::from("./quotes_data")
    }
}
