//! Error types for baymap

use std::path::PathBuf;
use std::time::Duration;

use baymap_common::exec::ExecError;
use baymap_common::mapfile::MapFileError;
use thiserror::Error;

/// Bay map resolver errors
#[derive(Error, Debug)]
pub enum BaymapError {
    /// The RAID controller tool is not installed
    #[error("tool not found: {program}")]
    ToolNotFound {
        /// The binary that could not be located
        program: String,
    },

    /// The RAID controller tool ran past its time bound
    #[error("tool timed out: '{program}' did not finish within {timeout:?}")]
    ToolTimeout {
        /// The binary that overran
        program: String,
        /// The configured bound
        timeout: Duration,
    },

    /// The RAID controller tool could not be executed
    #[error("tool error: {0}")]
    Tool(String),

    /// Malformed tool output or input table
    #[error("parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A layout row references a controller the inventory does not have
    #[error("bay {bay} references controller {controller}, which is not in the inventory")]
    KeyMissing {
        /// The controller index named by the layout row
        controller: usize,
        /// The bay whose row named it
        bay: u32,
    },

    /// A populated bay has no stable-id symlink
    #[error("no stable id for bay {bay}: device '{}' has no id-namespace symlink", canonical.display())]
    MissingStableId {
        /// The bay whose device lacks an id
        bay: u32,
        /// The canonical device node it resolved to
        canonical: PathBuf,
    },

    /// Two entries claim the same device, or one bay claims two
    #[error("duplicate device mapping: {0}")]
    DuplicateMapping(String),

    /// The output file is already present
    #[error("output file '{}' already exists; refusing to overwrite a captured map", path.display())]
    OutputExists {
        /// The path that was not written
        path: PathBuf,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BaymapError {
    /// Builds a [`BaymapError::Parse`]
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Builds a [`BaymapError::Config`]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Builds a [`BaymapError::DuplicateMapping`]
    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::DuplicateMapping(msg.into())
    }
}

impl From<ExecError> for BaymapError {
    fn from(e: ExecError) -> Self {
        match e {
            ExecError::NotFound { program } => BaymapError::ToolNotFound { program },
            ExecError::Timeout { program, timeout } => {
                BaymapError::ToolTimeout { program, timeout }
            }
            ExecError::Spawn { .. } => BaymapError::Tool(e.to_string()),
        }
    }
}

impl From<MapFileError> for BaymapError {
    fn from(e: MapFileError) -> Self {
        match e {
            MapFileError::AlreadyExists { path } => BaymapError::OutputExists { path },
            MapFileError::Malformed { .. } => BaymapError::Parse(e.to_string()),
            MapFileError::Io(io) => BaymapError::Io(io),
        }
    }
}

/// Result type for baymap operations
pub type Result<T> = std::result::Result<T, BaymapError>;
