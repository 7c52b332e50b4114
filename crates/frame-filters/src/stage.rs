//! Local and global filter stages

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use frame_fs::FileEntry;

use crate::curation::CurationIndex;
use crate::pattern::{NamePattern, matches_name};
use crate::recency;
use crate::sampler::{self, SamplerParams};

/// Deduplicated, path-ordered set of files.
pub type FileSet = BTreeSet<FileEntry>;

/// A stage applied to one directory's immediate children during the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalStage {
    /// Keep subdirectories and files whose basenames match the patterns.
    /// A missing pattern keeps its whole category.
    PathPattern {
        dir: Option<NamePattern>,
        file: Option<NamePattern>,
    },
    /// Keep only files starred and not suppressed in the directory's
    /// curation sidecar. A directory without a sidecar keeps no files.
    Curation,
}

impl LocalStage {
    /// Stage name as used in configuration.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PathPattern { .. } => "path_pattern",
            Self::Curation => "curation",
        }
    }

    /// Filter one directory's children, returning new collections.
    pub fn apply(
        &self,
        curation: &CurationIndex,
        directory: &Path,
        dirs: &[PathBuf],
        files: &[FileEntry],
    ) -> (Vec<PathBuf>, Vec<FileEntry>) {
        match self {
            Self::PathPattern { dir, file } => {
                let dirs = dirs
                    .iter()
                    .filter(|d| {
                        let name = d.file_name().map(|n| n.to_string_lossy());
                        matches_name(name.as_deref().unwrap_or(""), dir.as_ref())
                    })
                    .cloned()
                    .collect();
                let files = files
                    .iter()
                    .filter(|f| matches_name(&f.name(), file.as_ref()))
                    .cloned()
                    .collect();
                (dirs, files)
            }
            Self::Curation => {
                let Some(table) = curation.flags_for(directory) else {
                    return (dirs.to_vec(), Vec::new());
                };

                let kept: Vec<FileEntry> = files
                    .iter()
                    .filter(|f| table.is_selected(&f.name()))
                    .cloned()
                    .collect();

                if !kept.is_empty() || table.suppressed_count() > 0 {
                    tracing::debug!(
                        directory = %directory.display(),
                        starred = table.selected_count(),
                        suppressed = table.suppressed_count(),
                        kept = kept.len(),
                        "Curation filter"
                    );
                }
                (dirs.to_vec(), kept)
            }
        }
    }
}

/// A stage applied once to the complete set collected for one spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalStage {
    /// Keep the `pick` most recently modified files.
    Recent { pick: Option<usize> },
    /// Deterministic time-windowed sample.
    Sample(SamplerParams),
}

impl GlobalStage {
    /// Stage name as used in configuration.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Recent { .. } => "recent",
            Self::Sample(_) => "sample",
        }
    }

    /// Filter the collected set. `now` is the wall-clock time in Unix
    /// seconds, used by the sampler.
    pub fn apply(&self, files: FileSet, now: u64) -> FileSet {
        match self {
            Self::Recent { pick } => match pick {
                Some(pick) if *pick > 0 && !files.is_empty() => recency::most_recent(files, *pick),
                _ => files,
            },
            Self::Sample(params) => sampler::sample(files, params, now),
        }
    }
}
