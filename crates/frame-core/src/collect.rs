//! Tree collection
//!
//! A [`TreeCollector`] walks one [`TransferSpec`] root depth first with an
//! explicit stack, runs the local stages at every directory, and the global
//! stages once over everything it gathered.

use std::path::{Path, PathBuf};

use serde::Serialize;

use frame_filters::{CurationIndex, FileSet};
use frame_fs::FileEntry;

use crate::config::TransferSpec;

/// A directory the walk could not list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalkWarning {
    pub path: PathBuf,
    pub message: String,
}

/// Result of collecting one or more specs.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub files: FileSet,
    pub warnings: Vec<WalkWarning>,
}

impl Collection {
    /// Merge another collection into this one.
    pub fn absorb(&mut self, other: Collection) {
        self.files.extend(other.files);
        self.warnings.extend(other.warnings);
    }
}

/// Walks transfer specs, owning the curation cache for its lifetime.
#[derive(Debug, Default)]
pub struct TreeCollector {
    curation: CurationIndex,
}

impl TreeCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sidecar cache shared by every spec this collector walks.
    pub fn curation(&self) -> &CurationIndex {
        &self.curation
    }

    /// Collect the files selected by `spec`.
    ///
    /// `now` is the wall-clock time in Unix seconds handed to the global
    /// stages. Directories that cannot be listed contribute nothing and are
    /// reported in [`Collection::warnings`].
    pub fn collect(&self, spec: &TransferSpec, now: u64) -> Collection {
        let mut collection = Collection::default();
        let mut stack = vec![spec.path.clone()];

        while let Some(directory) = stack.pop() {
            let listing = match frame_fs::list_dir(&directory) {
                Ok(listing) => listing,
                Err(e) => {
                    tracing::warn!(path = %directory.display(), error = %e, "Cannot list directory");
                    collection.warnings.push(WalkWarning {
                        path: directory,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let (dirs, files) = self.apply_local(spec, &directory, listing.dirs, listing.files);
            for file in &files {
                tracing::trace!(path = %file.path().display(), "Selected file");
            }
            collection.files.extend(files);

            // Push in reverse so the smallest name is visited first
            let mut dirs = dirs;
            dirs.sort();
            stack.extend(dirs.into_iter().rev());
        }

        let collected = collection.files.len();
        collection.files = spec
            .global
            .iter()
            .fold(collection.files, |files, stage| {
                let before = files.len();
                let after = stage.apply(files, now);
                tracing::debug!(stage = stage.kind(), before, after = after.len(), "Global stage");
                after
            });

        tracing::info!(
            path = %spec.path.display(),
            collected,
            selected = collection.files.len(),
            "Collected transfer"
        );
        collection
    }

    /// Collect every spec and union the results. Global stages apply per
    /// spec before the union.
    pub fn collect_all(&self, specs: &[TransferSpec], now: u64) -> Collection {
        specs
            .iter()
            .fold(Collection::default(), |mut all, spec| {
                all.absorb(self.collect(spec, now));
                all
            })
    }

    fn apply_local(
        &self,
        spec: &TransferSpec,
        directory: &Path,
        dirs: Vec<PathBuf>,
        files: Vec<FileEntry>,
    ) -> (Vec<PathBuf>, Vec<FileEntry>) {
        spec.local
            .iter()
            .fold((dirs, files), |(dirs, files), stage| {
                stage.apply(&self.curation, directory, &dirs, &files)
            })
    }
}
