//! Run summary

use std::path::PathBuf;

use serde::Serialize;

use super::plan::SyncPlan;
use crate::collect::WalkWarning;

/// Why reconciliation did not run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "detail")]
pub enum RemoteSkip {
    /// No `[remote]` section configured
    NotConfigured,
    /// The inventory could not be fetched
    Unavailable(String),
}

/// Summary of one sync run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub dry_run: bool,
    /// Candidate files after all filters, across all transfers
    pub candidates: usize,
    /// Artifacts created (or, in a dry run, that would be created)
    pub fresh: usize,
    /// Artifacts already in the output directory
    pub present: usize,
    pub unsupported: usize,
    pub transform_failed: Vec<PathBuf>,
    pub duplicates: usize,
    /// Stale outputs removed (or, in a dry run, that would be removed)
    pub stale: Vec<PathBuf>,
    pub warnings: Vec<WalkWarning>,
    /// Set when reconciliation was skipped
    pub remote_skipped: Option<RemoteSkip>,
    pub plan: SyncPlan,
    pub uploaded: usize,
    pub upload_failed: Vec<PathBuf>,
    /// Count reported by the remote for the batched delete
    pub deleted: Option<usize>,
    /// Set when the delete request itself failed
    pub delete_error: Option<String>,
}

impl RunReport {
    /// Whether every per-file step succeeded.
    pub fn is_clean(&self) -> bool {
        self.transform_failed.is_empty()
            && self.upload_failed.is_empty()
            && self.delete_error.is_none()
            && self.warnings.is_empty()
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
