//! Error types for newsagent-core

use thiserror::Error;

/// Result type alias for newsagent-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for agent and tool operations
#[derive(Error, Debug)]
pub enum Error {
    /// Generic error message
    #[error("{0}")]
    Generic(String),

    /// Agent or tool construction failed
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// Agent or tool processing failed
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),

    /// A credential required by a capability is absent
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),
}
