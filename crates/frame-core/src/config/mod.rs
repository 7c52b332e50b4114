//! Run configuration
//!
//! `frame.toml` is parsed into a raw [`Manifest`] that mirrors the file,
//! then validated into a [`RunConfig`]: patterns compiled, sampler
//! parameters checked, defaults filled in.
//!
//! # Example
//!
//! ```
//! use frame_core::config::RunConfig;
//!
//! let config = RunConfig::parse(r#"
//! output_path = "/var/cache/frame"
//!
//! [[transfer]]
//! path = "/photos/2014"
//! local = [{ stage = "curation" }]
//! global = [{ stage = "sample", pick = 10 }]
//! "#).unwrap();
//!
//! assert_eq!(config.transfers.len(), 1);
//! assert!(config.remote.is_none());
//! ```

mod manifest;
mod settings;
mod transfer;

pub use manifest::{
    GlobalStageSection, LocalStageSection, Manifest, RemoteSection, TransferSection,
    TransformSection, UploadSection,
};
pub use settings::{
    DEFAULT_CONFIG_FILE, RemoteSettings, RunConfig, TransformSettings, UploadSettings,
};
pub use transfer::TransferSpec;
