//! Prometheus textfile rendering and atomic replacement
//!
//! One gauge, `node_disk_temperature`, labelled by bay number and the
//! canonical device node. The node-exporter textfile collector picks the
//! file up from its watched directory; samples carry no timestamps, the
//! collector rejects them.

use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{BaytempError, Result};

/// Exported metric name
pub const METRIC_NAME: &str = "node_disk_temperature";

/// File name the collector watches for
pub const TEXTFILE_NAME: &str = "hdd_temp.prom";

/// One probed bay: its device node and temperature, if the drive answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// The bay number
    pub bay: u32,
    /// Canonical device node the bay's drive sits at
    pub device: PathBuf,
    /// Probed temperature in Celsius, `None` when unknown
    pub celsius: Option<i32>,
}

/// Renders the samples in Prometheus text exposition format.
///
/// Unknown temperatures render as `NaN`, keeping the bay visible in the
/// series instead of silently dropping it.
pub fn render(samples: &[Sample]) -> String {
    let mut output = String::new();
    output.push_str("# HELP node_disk_temperature Drive temperature by chassis bay\n");
    output.push_str("# TYPE node_disk_temperature gauge\n");
    for sample in samples {
        let value = match sample.celsius {
            Some(celsius) => celsius.to_string(),
            None => "NaN".to_string(),
        };
        output.push_str(&format!(
            "{}{{bayno=\"{}\",device=\"{}\"}} {}\n",
            METRIC_NAME,
            sample.bay,
            escape_label(&sample.device.display().to_string()),
            value
        ));
    }
    output
}

/// Escapes a label value for the exposition format: backslash, double
/// quote and newline must not reach the label position raw.
fn escape_label(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Writes `content` into `dir` as [`TEXTFILE_NAME`], atomically.
///
/// The content lands in a temp file in the target directory first, gets
/// the collector's expected read-only mode, then renames over the final
/// name; the collector never observes a half-written file. The target
/// directory must already exist.
pub fn write(dir: &Path, content: &str) -> Result<PathBuf> {
    if !dir.is_dir() {
        return Err(BaytempError::config(format!(
            "textfile directory '{}' does not exist",
            dir.display()
        )));
    }

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o444))?;

    let target = dir.join(TEXTFILE_NAME);
    tmp.persist(&target).map_err(|e| BaytempError::Io(e.error))?;
    debug!(path = %target.display(), bytes = content.len(), "replaced textfile");
    Ok(target)
}
