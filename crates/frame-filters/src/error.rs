//! Error types for frame-filters

/// Result type for frame-filters operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building filter stages
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A name pattern failed to compile
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Sampler parameters that cannot produce a sub-window
    #[error("Invalid sampler parameters: {message}")]
    InvalidSampler { message: String },
}
