//! Integration tests for the baytemp exporter
//!
//! Drives the probe → render → publish path against a stub hddtemp and
//! a fake id namespace in a temp directory. No live hardware, no root.

use std::fs;
use std::os::unix::fs::symlink;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use baymap_common::mapfile::BayDeviceMap;
use baytemp::{hddtemp, textfile};

/// Test fixture: two live drives, one mapped bay whose id link dangles
struct TestRig {
    dir: tempfile::TempDir,
    hddtemp: PathBuf,
    by_id: PathBuf,
    textfile_dir: PathBuf,
}

impl TestRig {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let root = dir.path();

        let devices = root.join("dev");
        let by_id = root.join("dev/disk/by-id");
        let textfile_dir = root.join("textfile");
        fs::create_dir_all(&by_id).expect("Failed to create by-id dir");
        fs::create_dir(&textfile_dir).expect("Failed to create textfile dir");

        for node in ["sda", "sdb"] {
            fs::write(devices.join(node), b"").expect("Failed to create device node");
        }
        symlink("../../sda", by_id.join("ata-HGST_AAA")).expect("Failed to create symlink");
        symlink("../../sdb", by_id.join("ata-HGST_BBB")).expect("Failed to create symlink");
        symlink("../../sdq", by_id.join("ata-GONE")).expect("Failed to create symlink");

        let hddtemp = root.join("hddtemp");
        fs::write(
            &hddtemp,
            "#!/bin/sh\n\
             case \"$3\" in\n\
             */sda) echo 38 ;;\n\
             */sdb) echo 41 ;;\n\
             *) exit 1 ;;\n\
             esac\n",
        )
        .expect("Failed to write stub hddtemp");
        fs::set_permissions(&hddtemp, fs::Permissions::from_mode(0o755))
            .expect("Failed to chmod stub hddtemp");

        Self {
            dir,
            hddtemp,
            by_id,
            textfile_dir,
        }
    }

    fn map(&self) -> BayDeviceMap {
        let mut map = BayDeviceMap::new();
        map.insert(0, "ata-HGST_AAA").expect("insert");
        map.insert(1, "ata-HGST_BBB").expect("insert");
        map.insert(7, "ata-GONE").expect("insert");
        map
    }

    fn canonical(&self, node: &str) -> PathBuf {
        fs::canonicalize(self.dir.path().join("dev").join(node)).expect("Failed to canonicalize")
    }
}

#[tokio::test]
async fn test_collect_probes_mapped_bays() {
    let rig = TestRig::new();

    let samples = hddtemp::collect(&rig.hddtemp, &rig.by_id, &rig.map()).await;

    assert_eq!(samples.len(), 3);
    assert_eq!(samples[0].bay, 0);
    assert_eq!(samples[0].device, rig.canonical("sda"));
    assert_eq!(samples[0].celsius, Some(38));

    assert_eq!(samples[1].bay, 1);
    assert_eq!(samples[1].celsius, Some(41));

    // The dangling id name keeps its joined path and has no reading.
    assert_eq!(samples[2].bay, 7);
    assert_eq!(samples[2].device, rig.by_id.join("ata-GONE"));
    assert_eq!(samples[2].celsius, None);
}

#[tokio::test]
async fn test_end_to_end_publishes_textfile() {
    let rig = TestRig::new();

    let samples = hddtemp::collect(&rig.hddtemp, &rig.by_id, &rig.map()).await;
    let target =
        textfile::write(&rig.textfile_dir, &textfile::render(&samples)).expect("Publish failed");

    assert_eq!(target, rig.textfile_dir.join("hdd_temp.prom"));
    let content = fs::read_to_string(&target).expect("Textfile not written");
    assert!(content.starts_with("# HELP node_disk_temperature"));
    assert!(content.contains(&format!(
        "node_disk_temperature{{bayno=\"0\",device=\"{}\"}} 38\n",
        rig.canonical("sda").display()
    )));
    assert!(content.contains(&format!(
        "node_disk_temperature{{bayno=\"7\",device=\"{}\"}} NaN\n",
        rig.by_id.join("ata-GONE").display()
    )));
}

#[tokio::test]
async fn test_unmapped_chassis_publishes_header_only() {
    let rig = TestRig::new();

    let samples = hddtemp::collect(&rig.hddtemp, &rig.by_id, &BayDeviceMap::new()).await;
    let target =
        textfile::write(&rig.textfile_dir, &textfile::render(&samples)).expect("Publish failed");

    let content = fs::read_to_string(target).expect("Textfile not written");
    assert_eq!(content.lines().count(), 2);
}
