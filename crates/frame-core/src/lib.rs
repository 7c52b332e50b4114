//! Pipeline layer for frame-sync
//!
//! This crate ties the layer 0 crates together:
//!
//! - **Configuration**: `frame.toml` parsed and validated into a [`RunConfig`]
//! - **Collection**: [`TreeCollector`] walks each [`TransferSpec`]
//! - **Materialization**: [`TransformGateway`] fills the output directory
//! - **Reconciliation**: [`SyncEngine`] uploads and deletes against the remote
//!
//! ```text
//!                     frame-cli
//!                         |
//!                    frame-core
//!                         |
//!       +-----------------+-----------------+
//!       |                 |                 |
//!   frame-fs        frame-filters      frame-remote
//! ```

pub mod collect;
pub mod command;
pub mod config;
pub mod error;
pub mod sync;
pub mod transform;
pub mod upload;

pub use collect::{Collection, TreeCollector, WalkWarning};
pub use command::ToolCommand;
pub use config::{RunConfig, TransferSpec};
pub use error::{Error, Result};
pub use sync::{RemoteSkip, RunReport, SyncEngine, SyncOptions, SyncPlan};
pub use transform::{CommandTransform, Materialization, MaterializedSet, Transform, TransformGateway};
pub use upload::{CommandUploader, Uploader};

/// Current wall-clock time in whole Unix seconds.
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
