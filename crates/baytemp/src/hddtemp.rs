//! Drive temperature probing via hddtemp
//!
//! `hddtemp -n --unit=C <device>` prints a bare Celsius integer. A drive
//! that is asleep, unsupported or gone answers with a failure; that is
//! an unknown temperature here, never a run failure.

use std::fs;
use std::path::Path;

use baymap_common::exec;
use baymap_common::mapfile::BayDeviceMap;
use tracing::debug;

use crate::textfile::Sample;

/// Probes one device, `None` for any kind of failure.
pub async fn read_temperature(hddtemp: &Path, device: &Path) -> Option<i32> {
    let device = match device.to_str() {
        Some(device) => device,
        None => {
            debug!(device = %device.display(), "device path is not UTF-8, skipping probe");
            return None;
        }
    };
    let result = match exec::run(hddtemp, &["-n", "--unit=C", device], None).await {
        Ok(result) => result,
        Err(e) => {
            debug!(device, error = %e, "temperature probe did not run");
            return None;
        }
    };
    if !result.success() {
        debug!(
            device,
            exit_code = result.exit_code,
            stderr = %result.stderr,
            "temperature probe failed"
        );
        return None;
    }
    match result.stdout.parse() {
        Ok(celsius) => Some(celsius),
        Err(_) => {
            debug!(device, output = %result.stdout, "unparsable probe output");
            None
        }
    }
}

/// Probes every mapped bay, in ascending bay order.
///
/// The map carries id-namespace names; each is joined onto `by_id_dir`
/// and canonicalized before probing. A name that no longer resolves is
/// probed (and labelled) as the joined path, which fails and yields an
/// unknown temperature for that bay.
pub async fn collect(hddtemp: &Path, by_id_dir: &Path, map: &BayDeviceMap) -> Vec<Sample> {
    let mut samples = Vec::with_capacity(map.len());
    for (bay, name) in map.iter() {
        let joined = by_id_dir.join(name);
        let device = fs::canonicalize(&joined).unwrap_or(joined);
        let celsius = read_temperature(hddtemp, &device).await;
        debug!(bay, device = %device.display(), ?celsius, "probed bay");
        samples.push(Sample {
            bay,
            device,
            celsius,
        });
    }
    samples
}
