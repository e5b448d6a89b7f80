//! Device symlink namespace resolution
//!
//! Udev publishes two views of every disk: `/dev/disk/by-path` (names
//! derived from the physical attachment) and `/dev/disk/by-id` (names
//! derived from vendor and serial). Both are symlink farms pointing at
//! the same device nodes; resolving a name from each namespace to its
//! canonical node is what lets the two views be joined.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{BaymapError, Result};

/// Resolves one symlink to its canonical device node.
///
/// A relative target is interpreted relative to the link's own directory
/// before canonicalization. Absent links and dangling targets are `None`;
/// resolution is total and never faults.
pub fn resolve_link(link: &Path) -> Option<PathBuf> {
    let target = fs::read_link(link).ok()?;
    let joined = if target.is_relative() {
        link.parent()?.join(target)
    } else {
        target
    };
    fs::canonicalize(joined).ok()
}

/// Resolves every candidate name under `dir` into canonical → name.
///
/// Candidates with no backing link are omitted. Two names resolving to
/// the same node would make the later bay join ambiguous, so that is
/// rejected here, naming both offenders.
pub fn resolve_namespace(
    dir: &Path,
    names: impl IntoIterator<Item = impl AsRef<str>>,
) -> Result<BTreeMap<PathBuf, String>> {
    let mut namespace = BTreeMap::new();
    for name in names {
        let name = name.as_ref();
        let Some(canonical) = resolve_link(&dir.join(name)) else {
            trace!(dir = %dir.display(), name, "candidate does not resolve");
            continue;
        };
        if let Some(existing) = namespace.insert(canonical.clone(), name.to_string()) {
            return Err(BaymapError::duplicate(format!(
                "symlinks '{}' and '{}' in {} both resolve to '{}'",
                existing,
                name,
                dir.display(),
                canonical.display()
            )));
        }
    }
    debug!(dir = %dir.display(), resolved = namespace.len(), "resolved namespace");
    Ok(namespace)
}

/// Lists names under `dir` starting with `prefix`, sorted.
///
/// A missing directory is an empty namespace, not an error; udev only
/// creates these directories once a matching device appears.
pub fn discover_names(dir: &Path, prefix: &str) -> Result<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(dir = %dir.display(), "namespace directory absent, treating as empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(BaymapError::Io(e)),
    };
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            trace!(dir = %dir.display(), name = ?entry.file_name(), "skipping non-UTF-8 name");
            continue;
        };
        if name.starts_with(prefix) {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}
