//! Configuration file support for baytemp
//!
//! Loads and validates baytemp configuration from TOML files.
//! Default location: /etc/baymap/baytemp.toml

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BaytempError, Result};

/// Default config file location
pub const DEFAULT_CONFIG_PATH: &str = "/etc/baymap/baytemp.toml";

/// Probe tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Path to the hddtemp binary
    #[serde(default = "default_hddtemp_bin")]
    pub hddtemp_bin: PathBuf,
}

/// Input and output path configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Bay map artifact produced by baymap
    #[serde(default = "default_map")]
    pub map: PathBuf,

    /// Directory of identity-derived symlinks
    #[serde(default = "default_by_id_dir")]
    pub by_id_dir: PathBuf,

    /// Directory watched by the node-exporter textfile collector
    #[serde(default = "default_textfile_dir")]
    pub textfile_dir: PathBuf,
}

/// Complete baytemp configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Probe tool configuration
    #[serde(default)]
    pub tool: ToolConfig,

    /// Input and output paths
    #[serde(default)]
    pub paths: PathsConfig,
}

// Default functions
fn default_hddtemp_bin() -> PathBuf {
    PathBuf::from("/usr/sbin/hddtemp")
}

fn default_map() -> PathBuf {
    PathBuf::from("/etc/baymap/disk_map.csv")
}

fn default_by_id_dir() -> PathBuf {
    PathBuf::from("/dev/disk/by-id")
}

fn default_textfile_dir() -> PathBuf {
    PathBuf::from("/var/lib/prometheus/node-exporter")
}

// Default implementations
impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            hddtemp_bin: default_hddtemp_bin(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            map: default_map(),
            by_id_dir: default_by_id_dir(),
            textfile_dir: default_textfile_dir(),
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults if file not found
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => {
                let config = toml::from_str(&content).map_err(|e| {
                    BaytempError::config(format!(
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
            Err(e) => Err(BaytempError::Io(e)),
        }
    }

    /// Load from default location or defaults
    pub fn load() -> Result<Self> {
        Self::load_or_default(DEFAULT_CONFIG_PATH)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.tool.hddtemp_bin.as_os_str().is_empty() {
            return Err(BaytempError::config("hddtemp_bin must not be empty"));
        }

        if self.paths.map.as_os_str().is_empty() {
            return Err(BaytempError::config("map path must not be empty"));
        }

        if self.paths.textfile_dir.as_os_str().is_empty() {
            return Err(BaytempError::config("textfile_dir must not be empty"));
        }

        Ok(())
    }
}
