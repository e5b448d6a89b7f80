//! Drive temperature exporter for storage chassis
//!
//! Reads the bay map produced by `baymap`, probes each mapped drive with
//! hddtemp and publishes the temperatures as a Prometheus textfile keyed
//! by bay number, so dashboards can show heat per physical bay rather
//! than per kernel device name.

pub mod config;
pub mod error;
pub mod hddtemp;
pub mod textfile;

// Re-export commonly used items at crate root
pub use config::Config;
pub use error::{BaytempError, Result};
pub use textfile::Sample;
