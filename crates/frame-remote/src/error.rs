//! Error types for frame-remote

use std::time::Duration;

/// Result type for frame-remote operations
pub type Result<T> = std::result::Result<T, RemoteError>;

/// Errors that can occur talking to, or serving, the remote store
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Host name did not resolve to any address
    #[error("Could not resolve {host}:{port}")]
    Resolve { host: String, port: u16 },

    /// Connection could not be established
    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// An exchange exceeded its deadline
    #[error("Remote {command} timed out after {after:?}")]
    Timeout { command: String, after: Duration },

    /// The server answered with something the client cannot interpret
    #[error("Malformed response to {command}: '{response}'")]
    Malformed { command: String, response: String },

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Filesystem error from frame-fs (serving side)
    #[error(transparent)]
    Fs(#[from] frame_fs::Error),
}
