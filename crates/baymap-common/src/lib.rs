//! Common infrastructure for the baymap tools.
//!
//! This crate provides functionality shared by the chassis mapping
//! binaries (`baymap`, `baytemp`):
//!
//! - [`exec`]: Argv-based external tool execution with timeout support
//! - [`mapfile`]: The bay→device map artifact, its in-memory form and IO
//!
//! # Example
//!
//! ```ignore
//! use baymap_common::exec::{self, ExecError};
//!
//! async fn capture(storcli: &std::path::Path) -> Result<String, ExecError> {
//!     let result = exec::run(storcli, &["show"], None).await?;
//!     Ok(result.stdout)
//! }
//! ```

pub mod exec;
pub mod mapfile;

// Re-export commonly used items at crate root
pub use exec::{ExecError, ExecResult};
pub use mapfile::{BayDeviceMap, MapCollision, MapFileError};
