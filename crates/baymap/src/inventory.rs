//! Controller inventory via the RAID management tool
//!
//! Runs `storcli64 show` and parses the system-overview report into
//! [`ControllerRecord`]s. The report is a fixed-shape text document: a
//! `Status Code = <n>` header, then a controller table fenced by rule
//! rows of exactly 60 dashes. Data rows sit between the second and third
//! rule (the column header sits between the first and second).

use std::path::Path;
use std::time::Duration;

use baymap_common::exec;
use tracing::{debug, info};

use crate::error::{BaymapError, Result};
use crate::pci::normalize_pci_address;
use crate::types::ControllerRecord;

/// Rule row fencing the controller table.
const TABLE_RULE: &str = "------------------------------------------------------------";

/// Whitespace-split column positions in a controller data row.
const COL_MODEL: usize = 1;
const COL_PCI: usize = 6;

/// Queries the management tool and parses its inventory report.
///
/// `timeout = None` waits for the tool indefinitely. A missing binary is
/// [`BaymapError::ToolNotFound`]; a non-zero exit is a parse-class
/// failure carrying the tool's output, both streams: the tool writes
/// some diagnostics to stdout.
pub async fn fetch(storcli: &Path, timeout: Option<Duration>) -> Result<Vec<ControllerRecord>> {
    info!(program = %storcli.display(), "querying controller inventory");
    let result = exec::run(storcli, &["show"], timeout).await?;
    if !result.success() {
        return Err(BaymapError::parse(format!(
            "'{} show' exited with code {}: {}",
            storcli.display(),
            result.exit_code,
            result.combined_output()
        )));
    }
    parse_show_report(&result.stdout)
}

/// Parses the text of a `show` report.
///
/// Pure function over the report text; the `index` of each record is its
/// position in table order, which is the join key the bay layout uses.
pub fn parse_show_report(report: &str) -> Result<Vec<ControllerRecord>> {
    let status = report
        .lines()
        .find(|line| line.starts_with("Status Code"))
        .and_then(|line| line.split('=').nth(1))
        .map(str::trim)
        .ok_or_else(|| BaymapError::parse("report has no 'Status Code' header"))?;
    if status != "0" {
        return Err(BaymapError::parse(format!(
            "tool reported status code {status}, expected 0"
        )));
    }

    let lines: Vec<&str> = report.lines().collect();
    let rules: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| **line == TABLE_RULE)
        .map(|(i, _)| i)
        .collect();
    if rules.len() < 3 {
        return Err(BaymapError::parse(format!(
            "controller table not found: expected 3 rule rows, found {}",
            rules.len()
        )));
    }

    let mut controllers = Vec::new();
    for (pos, line) in lines[rules[1] + 1..rules[2]].iter().enumerate() {
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.len() <= COL_PCI {
            return Err(BaymapError::parse(format!(
                "controller row '{}' has {} columns, expected at least {}",
                line.trim(),
                cols.len(),
                COL_PCI + 1
            )));
        }
        controllers.push(ControllerRecord {
            index: pos,
            model: cols[COL_MODEL].to_string(),
            pci_address: normalize_pci_address(cols[COL_PCI]),
        });
    }
    debug!(count = controllers.len(), "parsed controller inventory");
    Ok(controllers)
}
