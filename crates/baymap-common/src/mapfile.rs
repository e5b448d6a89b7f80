//! The bay→device map artifact shared by the baymap tools.
//!
//! `baymap` produces the artifact once per capture; `baytemp` (and any
//! other downstream consumer) reads it back. The on-disk form is a small
//! header-led table:
//!
//! ```text
//! bay,device
//! 0,ata-HGST_HUS726T4TALA6L4_V6G2MJVR
//! 1,ata-HGST_HUS726T4TALA6L4_V6G2NK0R
//! ```
//!
//! Rows ascend by bay number and the `device` column carries the
//! id-namespace symlink *name*, never a resolved path; consumers join it
//! with their own namespace directory when they need a device node.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Header row of the map artifact.
pub const MAP_HEADER: &str = "bay,device";

/// Name of the bay column.
pub const COL_BAY: &str = "bay";

/// Name of the device column.
pub const COL_DEVICE: &str = "device";

/// Errors for map artifact IO.
#[derive(Debug, Error)]
pub enum MapFileError {
    /// The target path already holds a captured map.
    #[error("map file '{}' already exists; refusing to overwrite a captured map", path.display())]
    AlreadyExists {
        /// The path that was not written.
        path: PathBuf,
    },

    /// The file content does not follow the artifact format.
    #[error("{}:{}: {}", path.display(), line, reason)]
    Malformed {
        /// The file being read.
        path: PathBuf,
        /// 1-based line number of the offending row.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// Underlying filesystem failure.
    #[error("map file I/O: {0}")]
    Io(#[from] io::Error),
}

/// A rejected [`BayDeviceMap::insert`].
///
/// The map never overwrites silently; either side of a collision is
/// reported with the entry that already holds the slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapCollision {
    /// The bay already carries a device.
    #[error("bay {bay} is already mapped to '{existing_device}'")]
    Bay {
        /// The contested bay number.
        bay: u32,
        /// The device already recorded for it.
        existing_device: String,
    },

    /// The device is already claimed by another bay.
    #[error("device '{device}' is already mapped to bay {existing_bay}")]
    Device {
        /// The contested device name.
        device: String,
        /// The bay already holding it.
        existing_bay: u32,
    },
}

/// Bay number → stable device identifier, bijective by construction.
///
/// Insertion refuses both bay and device collisions instead of keeping the
/// last write; iteration ascends by bay number, which is the on-disk row
/// order contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BayDeviceMap {
    entries: BTreeMap<u32, String>,
    claimed: BTreeMap<String, u32>,
}

impl BayDeviceMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of mapped bays.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no bay is mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the device mapped to `bay`, if any.
    pub fn device(&self, bay: u32) -> Option<&str> {
        self.entries.get(&bay).map(String::as_str)
    }

    /// Returns the bay claiming `device`, if any.
    pub fn bay_for(&self, device: &str) -> Option<u32> {
        self.claimed.get(device).copied()
    }

    /// Records `bay → device`.
    ///
    /// Fails if the bay is already mapped or the device is already claimed
    /// by another bay; the map is left unchanged in that case.
    pub fn insert(&mut self, bay: u32, device: &str) -> Result<(), MapCollision> {
        if let Some(existing_device) = self.entries.get(&bay) {
            return Err(MapCollision::Bay {
                bay,
                existing_device: existing_device.clone(),
            });
        }
        if let Some(&existing_bay) = self.claimed.get(device) {
            return Err(MapCollision::Device {
                device: device.to_string(),
                existing_bay,
            });
        }
        self.entries.insert(bay, device.to_string());
        self.claimed.insert(device.to_string(), bay);
        Ok(())
    }

    /// Iterates entries in ascending bay order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.entries.iter().map(|(bay, device)| (*bay, device.as_str()))
    }
}

/// Renders the artifact text: header plus one row per bay, ascending.
pub fn render(map: &BayDeviceMap) -> String {
    let mut out = String::new();
    out.push_str(MAP_HEADER);
    out.push('\n');
    for (bay, device) in map.iter() {
        out.push_str(&format!("{},{}\n", bay, device));
    }
    out
}

/// Writes the artifact to `path`, which must not exist yet.
///
/// The open uses `create_new`, so even a racing second writer cannot
/// clobber a captured map; the loser sees [`MapFileError::AlreadyExists`].
pub fn write(path: &Path, map: &BayDeviceMap) -> Result<(), MapFileError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| {
            if e.kind() == io::ErrorKind::AlreadyExists {
                MapFileError::AlreadyExists {
                    path: path.to_path_buf(),
                }
            } else {
                MapFileError::Io(e)
            }
        })?;
    file.write_all(render(map).as_bytes())?;
    Ok(())
}

/// Reads an artifact back into a [`BayDeviceMap`].
///
/// The reader is permissive about incidental formatting: CRLF line
/// endings, padded fields, reordered or extra columns and blank lines are
/// all accepted. Structural problems (missing `bay`/`device` columns,
/// non-numeric bays, duplicate entries) are [`MapFileError::Malformed`].
pub fn read(path: &Path) -> Result<BayDeviceMap, MapFileError> {
    let content = fs::read_to_string(path)?;
    let mut lines = content.lines();

    let header = lines.next().ok_or_else(|| MapFileError::Malformed {
        path: path.to_path_buf(),
        line: 1,
        reason: "empty file, expected header row".to_string(),
    })?;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    let bay_col = column_index(&columns, COL_BAY, path)?;
    let device_col = column_index(&columns, COL_DEVICE, path)?;

    let mut map = BayDeviceMap::new();
    for (idx, line) in lines.enumerate() {
        let line_no = idx + 2;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let malformed = |reason: String| MapFileError::Malformed {
            path: path.to_path_buf(),
            line: line_no,
            reason,
        };
        if fields.len() <= bay_col.max(device_col) {
            return Err(malformed(format!(
                "expected at least {} columns, found {}",
                bay_col.max(device_col) + 1,
                fields.len()
            )));
        }
        let bay: u32 = fields[bay_col]
            .parse()
            .map_err(|_| malformed(format!("bay '{}' is not an integer", fields[bay_col])))?;
        map.insert(bay, fields[device_col])
            .map_err(|collision| malformed(collision.to_string()))?;
    }
    Ok(map)
}

fn column_index(columns: &[&str], name: &str, path: &Path) -> Result<usize, MapFileError> {
    columns
        .iter()
        .position(|c| *c == name)
        .ok_or_else(|| MapFileError::Malformed {
            path: path.to_path_buf(),
            line: 1,
            reason: format!("header is missing the '{}' column", name),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> BayDeviceMap {
        let mut map = BayDeviceMap::new();
        map.insert(4, "ata-HGST_A").unwrap();
        map.insert(1, "ata-HGST_B").unwrap();
        map.insert(12, "ata-HGST_C").unwrap();
        map
    }

    #[test]
    fn test_insert_and_lookup() {
        let map = sample_map();
        assert_eq!(map.len(), 3);
        assert_eq!(map.device(4), Some("ata-HGST_A"));
        assert_eq!(map.bay_for("ata-HGST_C"), Some(12));
        assert_eq!(map.device(99), None);
    }

    #[test]
    fn test_insert_rejects_duplicate_bay() {
        let mut map = sample_map();
        let err = map.insert(4, "ata-OTHER").unwrap_err();
        assert_eq!(
            err,
            MapCollision::Bay {
                bay: 4,
                existing_device: "ata-HGST_A".to_string(),
            }
        );
        // Rejected insert must not disturb the map.
        assert_eq!(map.device(4), Some("ata-HGST_A"));
        assert_eq!(map.bay_for("ata-OTHER"), None);
    }

    #[test]
    fn test_insert_rejects_duplicate_device() {
        let mut map = sample_map();
        let err = map.insert(7, "ata-HGST_B").unwrap_err();
        assert_eq!(
            err,
            MapCollision::Device {
                device: "ata-HGST_B".to_string(),
                existing_bay: 1,
            }
        );
        assert_eq!(map.device(7), None);
    }

    #[test]
    fn test_iteration_ascends_by_bay() {
        let bays: Vec<u32> = sample_map().iter().map(|(bay, _)| bay).collect();
        assert_eq!(bays, vec![1, 4, 12]);
    }

    #[test]
    fn test_render_format() {
        let rendered = render(&sample_map());
        assert_eq!(
            rendered,
            "bay,device\n1,ata-HGST_B\n4,ata-HGST_A\n12,ata-HGST_C\n"
        );
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("disk_map.csv");
        let map = sample_map();

        write(&path, &map).unwrap();
        let loaded = read(&path).unwrap();
        assert_eq!(loaded, map);
    }

    #[test]
    fn test_write_refuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("disk_map.csv");
        fs::write(&path, "bay,device\n").unwrap();

        let err = write(&path, &sample_map()).unwrap_err();
        match err {
            MapFileError::AlreadyExists { path: p } => assert_eq!(p, path),
            other => panic!("expected AlreadyExists, got {other:?}"),
        }
        // The captured content must be untouched.
        assert_eq!(fs::read_to_string(&path).unwrap(), "bay,device\n");
    }

    #[test]
    fn test_read_tolerates_crlf_and_padding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("disk_map.csv");
        fs::write(&path, "bay,device\r\n 3 , ata-X \r\n\r\n10,ata-Y\r\n").unwrap();

        let map = read(&path).unwrap();
        assert_eq!(map.device(3), Some("ata-X"));
        assert_eq!(map.device(10), Some("ata-Y"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_read_accepts_reordered_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("disk_map.csv");
        fs::write(&path, "device,bay\nata-X,3\n").unwrap();

        let map = read(&path).unwrap();
        assert_eq!(map.device(3), Some("ata-X"));
    }

    #[test]
    fn test_read_rejects_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("disk_map.csv");
        fs::write(&path, "bay\n3\n").unwrap();

        let err = read(&path).unwrap_err();
        match err {
            MapFileError::Malformed { line, reason, .. } => {
                assert_eq!(line, 1);
                assert!(reason.contains("device"));
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_read_rejects_bad_bay_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("disk_map.csv");
        fs::write(&path, "bay,device\ntwelve,ata-X\n").unwrap();

        let err = read(&path).unwrap_err();
        match err {
            MapFileError::Malformed { line, .. } => assert_eq!(line, 2),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_read_rejects_duplicate_bay() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("disk_map.csv");
        fs::write(&path, "bay,device\n3,ata-X\n3,ata-Y\n").unwrap();

        let err = read(&path).unwrap_err();
        match err {
            MapFileError::Malformed { line, reason, .. } => {
                assert_eq!(line, 3);
                assert!(reason.contains("bay 3"));
            }
            other => panic!("expected Malformed, got {other:?}"),
        }
    }
}
