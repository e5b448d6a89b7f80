//! Error types for baybench

use thiserror::Error;

/// Bench ingester errors
///
/// Posting failures are not errors: a sink that refuses a document
/// costs that document a warning, not the run. Only configuration and
/// pipe IO can fail the session.
#[derive(Error, Debug)]
pub enum BaybenchError {
    /// Configuration or input error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BaybenchError {
    /// Builds a [`BaybenchError::Config`]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type for baybench operations
pub type Result<T> = std::result::Result<T, BaybenchError>;
