//! Type definitions for baymap

/// One RAID controller as reported by the inventory tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerRecord {
    /// Zero-based controller index (the tool's "Ctl" column)
    pub index: usize,
    /// Controller model string
    pub model: String,
    /// Normalized PCI address, e.g. "0000:5e:00.0"
    pub pci_address: String,
}

impl ControllerRecord {
    /// Create a new ControllerRecord
    pub fn new(index: usize, model: impl Into<String>, pci_address: impl Into<String>) -> Self {
        Self {
            index,
            model: model.into(),
            pci_address: pci_address.into(),
        }
    }
}

/// One row of the operator-maintained bay layout table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BayLayoutEntry {
    /// Index of the controller the bay hangs off
    pub controller_ref: usize,
    /// SAS phy number on that controller
    pub phy: u32,
    /// Physical bay number silk-screened on the chassis
    pub bay: u32,
}

impl BayLayoutEntry {
    /// Create a new BayLayoutEntry
    pub fn new(controller_ref: usize, phy: u32, bay: u32) -> Self {
        Self {
            controller_ref,
            phy,
            bay,
        }
    }
}

/// Builds the predicted by-path symlink name for a controller/phy pair.
///
/// The kernel names SAS-attached disks after the controller's PCI address
/// and the phy the drive sits behind, always at LUN 0 for direct-attached
/// bays.
pub fn build_path_name(pci_address: &str, phy: u32) -> String {
    format!("pci-{}-sas-phy{}-lun-0", pci_address, phy)
}
