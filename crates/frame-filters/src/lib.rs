//! Filter stages for frame-sync
//!
//! Selection of photos out of a directory tree happens in two shapes of
//! stage:
//!
//! - **Local** stages see one directory's immediate children while the tree is
//!   walked: [`LocalStage::PathPattern`] and [`LocalStage::Curation`].
//! - **Global** stages see the complete set collected for one transfer spec:
//!   [`GlobalStage::Recent`] and [`GlobalStage::Sample`].
//!
//! Stages run in configured order, each consuming the previous output.

pub mod curation;
pub mod error;
pub mod pattern;
pub mod recency;
pub mod sampler;
pub mod stage;

pub use curation::{CurationFlags, CurationIndex, CurationTable, SIDECAR_NAME};
pub use error::{Error, Result};
pub use pattern::{NamePattern, matches_name};
pub use sampler::SamplerParams;
pub use stage::{FileSet, GlobalStage, LocalStage};
