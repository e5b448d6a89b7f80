//! Bay correlation
//!
//! The join at the heart of baymap. The layout says which controller and
//! phy each bay hangs off; the inventory gives each controller's PCI
//! address; the path namespace ties PCI+phy to a device node; the id
//! namespace gives that node its stable name. Chained together they map
//! bay → stable device name.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use baymap_common::mapfile::{BayDeviceMap, MapCollision};
use tracing::{debug, warn};

use crate::error::{BaymapError, Result};
use crate::types::{build_path_name, BayLayoutEntry, ControllerRecord};

/// A populated bay excluded from the map for lack of a stable id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBay {
    /// The bay number
    pub bay: u32,
    /// The canonical node that had no id-namespace name
    pub canonical: PathBuf,
}

/// Outcome of a correlation run.
#[derive(Debug, Default)]
pub struct Correlation {
    /// The final bay → device map
    pub map: BayDeviceMap,
    /// Bays excluded for lack of a stable id, in layout order
    pub skipped: Vec<SkippedBay>,
}

/// Synthesizes the by-path names the layout can produce, deduplicated.
///
/// Every controller reference is validated here even when the bay turns
/// out to be empty; a layout row naming a controller the chassis does
/// not have is a broken layout, not an empty bay.
pub fn path_candidates(
    layout: &[BayLayoutEntry],
    controllers: &[ControllerRecord],
) -> Result<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    for entry in layout {
        let controller = lookup_controller(controllers, entry)?;
        names.insert(build_path_name(&controller.pci_address, entry.phy));
    }
    Ok(names)
}

/// Joins layout, inventory and the two namespaces into a bay map.
///
/// Per layout row: an invalid controller reference is fatal; a path name
/// with no resolved node is an empty bay and is skipped; a resolved node
/// with no id name is excluded and reported (fatal under `strict`). Any
/// entry colliding with an already-recorded bay or device is fatal, with
/// both offenders named.
pub fn correlate(
    layout: &[BayLayoutEntry],
    controllers: &[ControllerRecord],
    path_namespace: &BTreeMap<PathBuf, String>,
    id_namespace: &BTreeMap<PathBuf, String>,
    strict: bool,
) -> Result<Correlation> {
    // Name → node view of the path namespace. Names are unique across
    // the namespace, each resolves to at most one node.
    let by_path_name: BTreeMap<&str, &PathBuf> = path_namespace
        .iter()
        .map(|(canonical, name)| (name.as_str(), canonical))
        .collect();

    let mut outcome = Correlation::default();
    for entry in layout {
        let controller = lookup_controller(controllers, entry)?;
        let name = build_path_name(&controller.pci_address, entry.phy);

        let Some(&canonical) = by_path_name.get(name.as_str()) else {
            debug!(bay = entry.bay, name = %name, "bay unpopulated, skipping");
            continue;
        };

        let Some(device) = id_namespace.get(canonical) else {
            if strict {
                return Err(BaymapError::MissingStableId {
                    bay: entry.bay,
                    canonical: canonical.clone(),
                });
            }
            warn!(
                bay = entry.bay,
                canonical = %canonical.display(),
                "populated bay has no stable id, excluding from map"
            );
            outcome.skipped.push(SkippedBay {
                bay: entry.bay,
                canonical: canonical.clone(),
            });
            continue;
        };

        outcome
            .map
            .insert(entry.bay, device)
            .map_err(|collision| duplicate_error(entry.bay, device, collision))?;
    }

    debug!(
        mapped = outcome.map.len(),
        skipped = outcome.skipped.len(),
        "correlation complete"
    );
    Ok(outcome)
}

fn lookup_controller<'a>(
    controllers: &'a [ControllerRecord],
    entry: &BayLayoutEntry,
) -> Result<&'a ControllerRecord> {
    controllers
        .get(entry.controller_ref)
        .ok_or(BaymapError::KeyMissing {
            controller: entry.controller_ref,
            bay: entry.bay,
        })
}

fn duplicate_error(bay: u32, device: &str, collision: MapCollision) -> BaymapError {
    match collision {
        MapCollision::Bay {
            bay,
            existing_device,
        } => BaymapError::duplicate(format!(
            "bay {} is mapped to both '{}' and '{}'",
            bay, existing_device, device
        )),
        MapCollision::Device {
            device,
            existing_bay,
        } => BaymapError::duplicate(format!(
            "device '{}' is claimed by both bay {} and bay {}",
            device, existing_bay, bay
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controllers() -> Vec<ControllerRecord> {
        vec![
            ControllerRecord::new(0, "LSI3008-8i", "0000:01:00.0"),
            ControllerRecord::new(1, "LSI3008-8e", "0000:02:14.0"),
        ]
    }

    fn namespace(pairs: &[(&str, &str)]) -> BTreeMap<PathBuf, String> {
        pairs
            .iter()
            .map(|(node, name)| (PathBuf::from(node), name.to_string()))
            .collect()
    }

    #[test]
    fn test_correlate_single_bay() {
        let layout = vec![BayLayoutEntry::new(0, 4, 12)];
        let path_ns = namespace(&[("/dev/sda", "pci-0000:01:00.0-sas-phy4-lun-0")]);
        let id_ns = namespace(&[("/dev/sda", "ata-WDC_XYZ")]);

        let outcome = correlate(&layout, &controllers(), &path_ns, &id_ns, false).unwrap();
        assert_eq!(outcome.map.len(), 1);
        assert_eq!(outcome.map.device(12), Some("ata-WDC_XYZ"));
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn test_correlate_unpopulated_bay_is_silent() {
        let layout = vec![BayLayoutEntry::new(0, 4, 12)];
        let outcome = correlate(
            &layout,
            &controllers(),
            &BTreeMap::new(),
            &BTreeMap::new(),
            false,
        )
        .unwrap();
        assert!(outcome.map.is_empty());
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn test_correlate_missing_id_is_reported_and_skipped() {
        let layout = vec![
            BayLayoutEntry::new(0, 4, 12),
            BayLayoutEntry::new(0, 5, 13),
        ];
        let path_ns = namespace(&[
            ("/dev/sdb", "pci-0000:01:00.0-sas-phy4-lun-0"),
            ("/dev/sdc", "pci-0000:01:00.0-sas-phy5-lun-0"),
        ]);
        // /dev/sdb has no id name; /dev/sdc does.
        let id_ns = namespace(&[("/dev/sdc", "ata-OK")]);

        let outcome = correlate(&layout, &controllers(), &path_ns, &id_ns, false).unwrap();
        assert_eq!(outcome.map.device(13), Some("ata-OK"));
        assert_eq!(outcome.map.device(12), None);
        assert_eq!(
            outcome.skipped,
            vec![SkippedBay {
                bay: 12,
                canonical: PathBuf::from("/dev/sdb"),
            }]
        );
    }

    #[test]
    fn test_correlate_strict_promotes_missing_id() {
        let layout = vec![BayLayoutEntry::new(0, 4, 12)];
        let path_ns = namespace(&[("/dev/sdb", "pci-0000:01:00.0-sas-phy4-lun-0")]);

        let err = correlate(&layout, &controllers(), &path_ns, &BTreeMap::new(), true).unwrap_err();
        match err {
            BaymapError::MissingStableId { bay, canonical } => {
                assert_eq!(bay, 12);
                assert_eq!(canonical, PathBuf::from("/dev/sdb"));
            }
            other => panic!("expected MissingStableId, got {other:?}"),
        }
    }

    #[test]
    fn test_correlate_invalid_controller_ref() {
        let layout = vec![BayLayoutEntry::new(5, 0, 3)];
        let err = correlate(
            &layout,
            &controllers(),
            &BTreeMap::new(),
            &BTreeMap::new(),
            false,
        )
        .unwrap_err();
        match err {
            BaymapError::KeyMissing { controller, bay } => {
                assert_eq!(controller, 5);
                assert_eq!(bay, 3);
            }
            other => panic!("expected KeyMissing, got {other:?}"),
        }
    }

    #[test]
    fn test_correlate_two_bays_one_device() {
        // Two rows naming the same controller/phy claim the same disk.
        let layout = vec![
            BayLayoutEntry::new(0, 4, 12),
            BayLayoutEntry::new(0, 4, 13),
        ];
        let path_ns = namespace(&[("/dev/sda", "pci-0000:01:00.0-sas-phy4-lun-0")]);
        let id_ns = namespace(&[("/dev/sda", "ata-WDC_XYZ")]);

        let err = correlate(&layout, &controllers(), &path_ns, &id_ns, false).unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, BaymapError::DuplicateMapping(_)));
        assert!(msg.contains("bay 12"));
        assert!(msg.contains("bay 13"));
    }

    #[test]
    fn test_correlate_one_bay_twice() {
        let layout = vec![
            BayLayoutEntry::new(0, 4, 12),
            BayLayoutEntry::new(0, 5, 12),
        ];
        let path_ns = namespace(&[
            ("/dev/sda", "pci-0000:01:00.0-sas-phy4-lun-0"),
            ("/dev/sdb", "pci-0000:01:00.0-sas-phy5-lun-0"),
        ]);
        let id_ns = namespace(&[("/dev/sda", "ata-A"), ("/dev/sdb", "ata-B")]);

        let err = correlate(&layout, &controllers(), &path_ns, &id_ns, false).unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, BaymapError::DuplicateMapping(_)));
        assert!(msg.contains("'ata-A'"));
        assert!(msg.contains("'ata-B'"));
    }

    #[test]
    fn test_path_candidates_dedupes_and_validates() {
        let layout = vec![
            BayLayoutEntry::new(0, 4, 12),
            BayLayoutEntry::new(0, 4, 13),
            BayLayoutEntry::new(1, 0, 14),
        ];
        let names = path_candidates(&layout, &controllers()).unwrap();
        assert_eq!(names.len(), 2);
        assert!(names.contains("pci-0000:01:00.0-sas-phy4-lun-0"));
        assert!(names.contains("pci-0000:02:14.0-sas-phy0-lun-0"));
    }

    #[test]
    fn test_path_candidates_rejects_bad_ref_even_for_empty_bay() {
        let layout = vec![BayLayoutEntry::new(9, 0, 1)];
        let err = path_candidates(&layout, &controllers()).unwrap_err();
        assert!(matches!(err, BaymapError::KeyMissing { .. }));
    }
}
