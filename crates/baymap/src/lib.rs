//! Bay map resolver for storage chassis
//!
//! Correlates RAID controller inventory, the operator's bay layout table
//! and the kernel's disk symlink namespaces into a bay → device map, so
//! that tooling (and humans swapping drives) can find the physical bay
//! holding a given Linux block device.

pub mod config;
pub mod correlate;
pub mod error;
pub mod inventory;
pub mod layout;
pub mod pci;
pub mod pipeline;
pub mod symlink;
pub mod types;

// Re-export commonly used items at crate root
pub use config::Config;
pub use correlate::{Correlation, SkippedBay};
pub use error::{BaymapError, Result};
pub use types::{BayLayoutEntry, ControllerRecord};
