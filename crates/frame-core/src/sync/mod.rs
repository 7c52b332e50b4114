//! Reconciliation against the remote frame
//!
//! - [`SyncPlan`]: upload and delete sets by case-folded basename
//! - [`SyncEngine`]: drives collection, materialization and reconciliation
//! - [`RunReport`]: what a run did

mod engine;
mod plan;
mod report;

pub use engine::{RemoteLink, SyncEngine, SyncOptions};
pub use plan::SyncPlan;
pub use report::{RemoteSkip, RunReport};
