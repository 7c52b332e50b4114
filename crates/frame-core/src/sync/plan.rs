//! Upload/delete planning by case-folded basename

use std::path::PathBuf;

use serde::Serialize;

use frame_remote::RemoteInventory;

use crate::transform::MaterializedSet;

/// What reconciliation will do. Computed once, consumed once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncPlan {
    /// Output paths missing on the remote, in path order
    pub uploads: Vec<PathBuf>,
    /// Remote files no longer materialized, spelled as the remote reported
    /// them, in case-folded order
    pub deletes: Vec<String>,
}

impl SyncPlan {
    /// `uploads = materialized - remote`, `deletes = remote - materialized`.
    pub fn compute(materialized: &MaterializedSet, remote: &RemoteInventory) -> Self {
        let local = materialized.names();

        let mut uploads: Vec<PathBuf> = local
            .iter()
            .filter(|name| !remote.contains(name))
            .filter_map(|name| materialized.path_of(name))
            .map(|path| path.to_path_buf())
            .collect();
        uploads.sort();

        let deletes = remote
            .folded_names()
            .filter(|name| !local.contains(*name))
            .flat_map(|name| remote.reported_names(name))
            .map(str::to_string)
            .collect();

        Self { uploads, deletes }
    }

    pub fn is_empty(&self) -> bool {
        self.uploads.is_empty() && self.deletes.is_empty()
    }
}
