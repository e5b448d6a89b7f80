//! Configuration file support for baymap
//!
//! Loads and validates baymap configuration from TOML files.
//! Default location: /etc/baymap/baymap.toml

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BaymapError, Result};

/// Default config file location
pub const DEFAULT_CONFIG_PATH: &str = "/etc/baymap/baymap.toml";

/// Management tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Path to the RAID management tool binary
    #[serde(default = "default_storcli_bin")]
    pub storcli_bin: PathBuf,

    /// Tool timeout in seconds; 0 waits indefinitely
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Input and output path configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Bay layout table
    #[serde(default = "default_layout")]
    pub layout: PathBuf,

    /// Output map artifact
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Directory of attachment-derived symlinks
    #[serde(default = "default_by_path_dir")]
    pub by_path_dir: PathBuf,

    /// Directory of identity-derived symlinks
    #[serde(default = "default_by_id_dir")]
    pub by_id_dir: PathBuf,

    /// Prefix selecting id-namespace names
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,
}

/// Complete baymap configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Management tool configuration
    #[serde(default)]
    pub tool: ToolConfig,

    /// Input and output paths
    #[serde(default)]
    pub paths: PathsConfig,
}

// Default functions
fn default_storcli_bin() -> PathBuf {
    PathBuf::from("/opt/MegaRAID/storcli/storcli64")
}

fn default_timeout_secs() -> u64 {
    0
}

fn default_layout() -> PathBuf {
    PathBuf::from("/etc/baymap/bay_layout.csv")
}

fn default_output() -> PathBuf {
    PathBuf::from("/etc/baymap/disk_map.csv")
}

fn default_by_path_dir() -> PathBuf {
    PathBuf::from("/dev/disk/by-path")
}

fn default_by_id_dir() -> PathBuf {
    PathBuf::from("/dev/disk/by-id")
}

fn default_id_prefix() -> String {
    "ata-".to_string()
}

// Default implementations
impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            storcli_bin: default_storcli_bin(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            layout: default_layout(),
            output: default_output(),
            by_path_dir: default_by_path_dir(),
            by_id_dir: default_by_id_dir(),
            id_prefix: default_id_prefix(),
        }
    }
}

impl ToolConfig {
    /// Get the tool timeout as a Duration; 0 means unbounded
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults if file not found
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => {
                let config = toml::from_str(&content).map_err(|e| {
                    BaymapError::config(format!(
                        "failed to parse config file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(BaymapError::Io(e)),
        }
    }

    /// Load from default location or defaults
    pub fn load() -> Result<Self> {
        Self::load_or_default(DEFAULT_CONFIG_PATH)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| BaymapError::config(format!("failed to serialize config: {}", e)))?;

        fs::write(path, content).map_err(BaymapError::Io)?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.tool.storcli_bin.as_os_str().is_empty() {
            return Err(BaymapError::config("storcli_bin must not be empty"));
        }

        if self.paths.layout.as_os_str().is_empty() {
            return Err(BaymapError::config("layout path must not be empty"));
        }

        if self.paths.output.as_os_str().is_empty() {
            return Err(BaymapError::config("output path must not be empty"));
        }

        // An empty prefix would admit every name in the id namespace and
        // give most nodes several competing names.
        if self.paths.id_prefix.is_empty() {
            return Err(BaymapError::config("id_prefix must not be empty"));
        }

        Ok(())
    }
}
