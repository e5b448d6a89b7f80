//! Error types for baytemp

use baymap_common::mapfile::MapFileError;
use thiserror::Error;

/// Temperature exporter errors
///
/// Probe failures are not errors: a drive that will not answer
/// `hddtemp` becomes an unknown temperature in the output, not a
/// failed run.
#[derive(Error, Debug)]
pub enum BaytempError {
    /// Configuration or input error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BaytempError {
    /// Builds a [`BaytempError::Config`]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<MapFileError> for BaytempError {
    fn from(e: MapFileError) -> Self {
        match e {
            MapFileError::Io(io) => BaytempError::Io(io),
            other => BaytempError::Config(other.to_string()),
        }
    }
}

/// Result type for baytemp operations
pub type Result<T> = std::result::Result<T, BaytempError>;
