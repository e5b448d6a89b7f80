//! Bay layout loader
//!
//! The bay layout is a small operator-maintained table describing how the
//! chassis is cabled: which controller (`pci`, an index into inventory
//! order) and phy each physical bay hangs off. Example:
//!
//! ```text
//! pci,phy,bay
//! 0,0,0
//! 0,1,1
//! 1,0,12
//! ```

use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::error::{BaymapError, Result};
use crate::types::BayLayoutEntry;

/// Reads and parses the layout table at `path`.
///
/// A missing file is a configuration error, not an IO error; the layout
/// is mandatory input and its absence names the path the operator has to
/// fill in.
pub fn load(path: &Path) -> Result<Vec<BayLayoutEntry>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(BaymapError::config(format!(
                "bay layout '{}' does not exist",
                path.display()
            )));
        }
        Err(e) => return Err(BaymapError::Io(e)),
    };
    let entries = parse_layout(&content).map_err(|e| match e {
        BaymapError::Config(msg) => BaymapError::config(format!("{}: {}", path.display(), msg)),
        other => other,
    })?;
    debug!(path = %path.display(), rows = entries.len(), "loaded bay layout");
    Ok(entries)
}

/// Parses layout text into entries, preserving row order.
///
/// The header row must name `pci`, `phy` and `bay`; column order is free
/// and extra columns are ignored. Bay uniqueness is not enforced here, a
/// conflicting pair of rows only matters once both resolve into the
/// output map.
pub fn parse_layout(content: &str) -> Result<Vec<BayLayoutEntry>> {
    let mut lines = content.lines();
    let header = lines
        .next()
        .ok_or_else(|| BaymapError::config("empty bay layout, expected a header row"))?;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    let pci_col = require_column(&columns, "pci")?;
    let phy_col = require_column(&columns, "phy")?;
    let bay_col = require_column(&columns, "bay")?;
    let width = pci_col.max(phy_col).max(bay_col);

    let mut entries = Vec::new();
    for (idx, line) in lines.enumerate() {
        let line_no = idx + 2;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() <= width {
            return Err(BaymapError::config(format!(
                "line {}: expected at least {} columns, found {}",
                line_no,
                width + 1,
                fields.len()
            )));
        }
        entries.push(BayLayoutEntry {
            controller_ref: parse_field(fields[pci_col], "pci", line_no)?,
            phy: parse_field(fields[phy_col], "phy", line_no)?,
            bay: parse_field(fields[bay_col], "bay", line_no)?,
        });
    }
    Ok(entries)
}

fn require_column(columns: &[&str], name: &str) -> Result<usize> {
    columns.iter().position(|c| *c == name).ok_or_else(|| {
        BaymapError::config(format!("layout header is missing the '{}' column", name))
    })
}

fn parse_field<T: FromStr>(field: &str, column: &str, line_no: usize) -> Result<T> {
    field.parse().map_err(|_| {
        BaymapError::config(format!(
            "line {}: column '{}' value '{}' is not an integer",
            line_no, column, field
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_layout() {
        let entries = parse_layout("pci,phy,bay\n0,0,0\n0,1,1\n1,0,12\n").unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], BayLayoutEntry::new(0, 0, 0));
        assert_eq!(entries[2], BayLayoutEntry::new(1, 0, 12));
    }

    #[test]
    fn test_parse_layout_reordered_and_extra_columns() {
        let entries = parse_layout("slot,bay,pci,phy\nA1,7,0,3\n").unwrap();
        assert_eq!(entries, vec![BayLayoutEntry::new(0, 3, 7)]);
    }

    #[test]
    fn test_parse_layout_tolerates_crlf_and_blanks() {
        let entries = parse_layout("pci,phy,bay\r\n0, 4 ,12\r\n\r\n").unwrap();
        assert_eq!(entries, vec![BayLayoutEntry::new(0, 4, 12)]);
    }

    #[test]
    fn test_parse_layout_missing_column() {
        let err = parse_layout("pci,phy\n0,0\n").unwrap_err();
        assert!(err.to_string().contains("'bay'"));
    }

    #[test]
    fn test_parse_layout_bad_integer() {
        let err = parse_layout("pci,phy,bay\n0,x,12\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("line 2"));
        assert!(msg.contains("'phy'"));
    }

    #[test]
    fn test_parse_layout_short_row() {
        let err = parse_layout("pci,phy,bay\n0,1\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_layout.csv");
        let err = load(&path).unwrap_err();
        match err {
            BaymapError::Config(msg) => assert!(msg.contains("no_layout.csv")),
            other => panic!("expected Config, got {other:?}"),
        }
    }

    #[test]
    fn test_load_reports_file_in_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bay_layout.csv");
        fs::write(&path, "pci,phy,bay\n0,x,12\n").unwrap();
        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("bay_layout.csv"));
    }
}
