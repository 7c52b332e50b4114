//! Error types for frame-core

use std::path::PathBuf;

/// Result type for frame-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in frame-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration file not found at expected path
    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration parsed but is not usable
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// An external tool could not be run or exited unsuccessfully
    #[error("Command '{command}' failed ({status}): {output}")]
    CommandFailed {
        command: String,
        status: String,
        output: String,
    },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from frame-fs
    #[error(transparent)]
    Fs(#[from] frame_fs::Error),

    /// Filter construction error from frame-filters
    #[error(transparent)]
    Filters(#[from] frame_filters::Error),

    /// Remote protocol error from frame-remote
    #[error(transparent)]
    Remote(#[from] frame_remote::RemoteError),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
