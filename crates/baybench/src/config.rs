//! Configuration file support for baybench
//!
//! The sink connection config is JSON, historically shared with other
//! tooling at ~/.config/elasticsearch.json. Unlike the rest of the
//! suite there is no default fallback: the file carries the sink URL
//! and there is no sane default for that.
//!
//! Extra-info files named on the command line are merged into every
//! posted document: a `.json` file contributes its top-level object,
//! anything else is read as `key=value` lines.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{BaybenchError, Result};

/// Config file location relative to the invoking user's home directory
pub const DEFAULT_CONFIG_RELATIVE: &str = ".config/elasticsearch.json";

/// Metrics sink connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the sink, e.g. `http://elastic.internal:9200`
    pub url: String,
}

impl Config {
    /// Resolves the default config path under `$HOME`.
    pub fn default_path() -> Result<PathBuf> {
        let home = std::env::var_os("HOME")
            .ok_or_else(|| BaybenchError::config("HOME is not set; pass --config explicitly"))?;
        Ok(PathBuf::from(home).join(DEFAULT_CONFIG_RELATIVE))
    }

    /// Loads the sink config. The file is mandatory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(BaybenchError::config(format!(
                    "sink config '{}' does not exist",
                    path.display()
                )));
            }
            Err(e) => return Err(BaybenchError::Io(e)),
        };

        serde_json::from_str(&content).map_err(|e| {
            BaybenchError::config(format!(
                "failed to parse sink config {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(BaybenchError::config("url must not be empty"));
        }

        reqwest::Url::parse(&self.url).map_err(|e| {
            BaybenchError::config(format!("sink url '{}' is not a valid URL: {}", self.url, e))
        })?;

        Ok(())
    }
}

/// Reads and merges the extra-info files, later files overriding earlier
/// ones.
///
/// A path that does not exist contributes nothing; callers pass optional
/// per-host annotation files that are not present everywhere.
pub fn load_extra_info(paths: &[PathBuf]) -> Result<Map<String, Value>> {
    let mut info = Map::new();

    for path in paths {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "extra info file absent, skipping");
                continue;
            }
            Err(e) => return Err(BaybenchError::Io(e)),
        };

        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        {
            let fields: Map<String, Value> = serde_json::from_str(&content).map_err(|e| {
                BaybenchError::config(format!(
                    "failed to parse extra info {}: {}",
                    path.display(),
                    e
                ))
            })?;
            info.extend(fields);
        } else {
            for line in content.lines() {
                if line.starts_with('#') {
                    continue;
                }
                let Some((key, value)) = line.split_once('=') else {
                    continue;
                };
                info.insert(key.trim().to_string(), coerce_value(value));
            }
        }
    }

    Ok(info)
}

/// Key=value values become numbers when they parse as one.
fn coerce_value(raw: &str) -> Value {
    let raw = raw.trim();
    match raw.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
        Some(number) => Value::Number(number),
        None => Value::String(raw.to_string()),
    }
}
