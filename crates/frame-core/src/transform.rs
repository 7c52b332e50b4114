//! Transform gateway
//!
//! Turns candidate source files into artifacts in the output directory.
//! A candidate whose basename already exists there is left alone; anything
//! in the output directory that no candidate maps to is removed afterwards.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::Serialize;

use frame_filters::FileSet;
use frame_fs::{FileEntry, fold_name};

use crate::command::ToolCommand;
use crate::config::TransformSettings;
use crate::Result;

/// Produces one output artifact from one source file.
pub trait Transform {
    /// Write the transformed form of `source` to `output`.
    ///
    /// On failure a partially written `output` may be left behind; the
    /// gateway removes it.
    fn transform(&self, source: &Path, output: &Path) -> Result<()>;
}

/// ImageMagick `convert` resize, then optionally `jhead -autorot`.
#[derive(Debug, Clone)]
pub struct CommandTransform {
    settings: TransformSettings,
}

impl CommandTransform {
    pub fn new(settings: TransformSettings) -> Self {
        Self { settings }
    }

    /// The resize command for one file.
    pub fn convert_command(&self, source: &Path, output: &Path) -> ToolCommand {
        let size = self.settings.size;
        ToolCommand::new(&self.settings.convert)
            .arg(source)
            .arg("-quality")
            .arg(self.settings.quality.to_string())
            .arg("-resize")
            .arg(format!("{size}x{size}>"))
            .arg(output)
    }

    /// The auto-orientation command, if one is configured.
    pub fn rotate_command(&self, output: &Path) -> Option<ToolCommand> {
        self.settings
            .autorotate
            .as_ref()
            .map(|jhead| ToolCommand::new(jhead).arg("-autorot").arg(output))
    }
}

impl Transform for CommandTransform {
    fn transform(&self, source: &Path, output: &Path) -> Result<()> {
        self.convert_command(source, output).run()?;
        if let Some(rotate) = self.rotate_command(output) {
            rotate.run()?;
        }
        Ok(())
    }
}

/// Output artifacts keyed by case-folded basename.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaterializedSet {
    /// Created during this run
    pub fresh: BTreeMap<String, PathBuf>,
    /// Already in the output directory
    pub present: BTreeMap<String, PathBuf>,
}

impl MaterializedSet {
    pub fn len(&self) -> usize {
        self.fresh.len() + self.present.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fresh.is_empty() && self.present.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fresh.contains_key(name) || self.present.contains_key(name)
    }

    /// Output path for a case-folded basename.
    pub fn path_of(&self, name: &str) -> Option<&Path> {
        self.fresh
            .get(name)
            .or_else(|| self.present.get(name))
            .map(PathBuf::as_path)
    }

    /// Every case-folded basename, fresh and present.
    pub fn names(&self) -> BTreeSet<String> {
        self.fresh.keys().chain(self.present.keys()).cloned().collect()
    }

    fn paths(&self) -> BTreeSet<&Path> {
        self.fresh
            .values()
            .chain(self.present.values())
            .map(PathBuf::as_path)
            .collect()
    }
}

/// Outcome of one gateway pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Materialization {
    pub set: MaterializedSet,
    /// Candidates skipped for an unaccepted extension
    pub unsupported: Vec<PathBuf>,
    /// Candidates whose transform failed
    pub failed: Vec<PathBuf>,
    /// Later candidates that mapped to an already claimed basename
    pub duplicates: Vec<PathBuf>,
    /// Output files no candidate maps to; removed unless previewing
    pub stale: Vec<PathBuf>,
}

/// Materializes candidates into an output directory.
pub struct TransformGateway<'a> {
    output_dir: &'a Path,
    settings: &'a TransformSettings,
    transform: &'a dyn Transform,
}

impl<'a> TransformGateway<'a> {
    pub fn new(
        output_dir: &'a Path,
        settings: &'a TransformSettings,
        transform: &'a dyn Transform,
    ) -> Self {
        Self {
            output_dir,
            settings,
            transform,
        }
    }

    /// Transform new candidates and remove stale outputs.
    ///
    /// Per-file failures are logged and recorded in the result.
    ///
    /// # Errors
    ///
    /// Returns an error only if the output directory cannot be created or
    /// listed.
    pub fn materialize(&self, candidates: &FileSet) -> Result<Materialization> {
        frame_fs::io::ensure_dir(self.output_dir)?;
        let mut result = self.partition(candidates, true);

        result.stale = self.stale_outputs(&result.set)?;
        let mut removed = 0usize;
        for path in &result.stale {
            tracing::debug!(path = %path.display(), "Removing stale output");
            match frame_fs::io::remove_file(path) {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to remove stale output"),
            }
        }

        tracing::info!(
            candidates = candidates.len(),
            resized = result.set.fresh.len(),
            skipped = result.set.present.len(),
            failed = result.failed.len(),
            unsupported = result.unsupported.len(),
            cleaned = removed,
            "Materialized output"
        );
        Ok(result)
    }

    /// Compute what [`materialize`](Self::materialize) would do without
    /// running any transform or touching the output directory.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing output directory cannot be listed.
    pub fn preview(&self, candidates: &FileSet) -> Result<Materialization> {
        let mut result = self.partition(candidates, false);
        if self.output_dir.is_dir() {
            result.stale = self.stale_outputs(&result.set)?;
        }
        Ok(result)
    }

    fn partition(&self, candidates: &FileSet, apply: bool) -> Materialization {
        let mut result = Materialization::default();
        let total = candidates.len();

        for (idx, candidate) in candidates.iter().enumerate() {
            let name = candidate.name().to_string();
            let key = fold_name(&name);
            let output = self.output_dir.join(&name);

            if result.set.contains(&key) {
                tracing::debug!(
                    path = %candidate.path().display(),
                    name = %key,
                    "Basename already claimed by an earlier candidate"
                );
                result.duplicates.push(candidate.path().to_path_buf());
                continue;
            }

            if output.is_file() {
                tracing::debug!(
                    source = %candidate.path().display(),
                    output = %output.display(),
                    "Output already exists"
                );
                result.set.present.insert(key, output);
                continue;
            }

            if !self.accepts(candidate) {
                tracing::error!(path = %candidate.path().display(), "Not an accepted image type, skipping");
                result.unsupported.push(candidate.path().to_path_buf());
                continue;
            }

            if !apply {
                result.set.fresh.insert(key, output);
                continue;
            }

            tracing::debug!(
                source = %candidate.path().display(),
                output = %output.display(),
                index = idx + 1,
                total,
                "Transforming file"
            );
            match self.transform.transform(candidate.path(), &output) {
                Ok(()) if output.is_file() => {
                    result.set.fresh.insert(key, output);
                }
                Ok(()) => {
                    tracing::error!(
                        source = %candidate.path().display(),
                        output = %output.display(),
                        "Transform reported success but produced no output"
                    );
                    result.failed.push(candidate.path().to_path_buf());
                }
                Err(e) => {
                    tracing::error!(source = %candidate.path().display(), error = %e, "Transform failed");
                    discard_partial(&output);
                    result.failed.push(candidate.path().to_path_buf());
                }
            }
        }

        result
    }

    fn accepts(&self, candidate: &FileEntry) -> bool {
        candidate
            .extension()
            .is_some_and(|ext| self.settings.accepts(&ext))
    }

    fn stale_outputs(&self, set: &MaterializedSet) -> Result<Vec<PathBuf>> {
        let keep = set.paths();
        Ok(frame_fs::list_regular_files(self.output_dir)?
            .into_iter()
            .filter(|path| !keep.contains(path.as_path()))
            .collect())
    }
}

fn discard_partial(output: &Path) {
    match frame_fs::io::remove_if_file(output) {
        Ok(true) => tracing::warn!(path = %output.display(), "Removed partial output"),
        Ok(false) => {}
        Err(e) => tracing::warn!(path = %output.display(), error = %e, "Failed to remove partial output"),
    }
}
