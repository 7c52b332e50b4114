//! SyncEngine implementation
//!
//! One run: collect every transfer, materialize the union into the output
//! directory, then reconcile the output directory against the remote
//! inventory.

use frame_filters::FileSet;
use frame_remote::{RemoteClient, RemoteStore};

use super::plan::SyncPlan;
use super::report::{RemoteSkip, RunReport};
use crate::Result;
use crate::collect::TreeCollector;
use crate::config::RunConfig;
use crate::transform::{CommandTransform, Materialization, Transform, TransformGateway};
use crate::upload::{CommandUploader, Uploader};

/// Options for a sync run
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Collect and plan only: no transforms, no deletions, no uploads.
    pub dry_run: bool,
}

/// The remote side of a run: inventory access plus byte transport.
pub struct RemoteLink {
    pub store: Box<dyn RemoteStore>,
    pub uploader: Box<dyn Uploader>,
}

/// Runs the pipeline for one [`RunConfig`].
pub struct SyncEngine<'a> {
    config: &'a RunConfig,
    transform: Box<dyn Transform>,
    remote: Option<RemoteLink>,
}

impl<'a> SyncEngine<'a> {
    /// Engine using the command-line transform and uploader and the TCP
    /// remote client, as configured.
    pub fn from_config(config: &'a RunConfig) -> Self {
        let remote = config.remote.as_ref().map(|remote| RemoteLink {
            store: Box::new(
                RemoteClient::new(&remote.host, remote.port).with_timeout(remote.timeout),
            ),
            uploader: Box::new(CommandUploader::new(config.upload.clone(), &remote.host)),
        });
        Self {
            config,
            transform: Box::new(CommandTransform::new(config.transform.clone())),
            remote,
        }
    }

    pub fn with_transform(mut self, transform: impl Transform + 'static) -> Self {
        self.transform = Box::new(transform);
        self
    }

    pub fn with_remote(
        mut self,
        store: impl RemoteStore + 'static,
        uploader: impl Uploader + 'static,
    ) -> Self {
        self.remote = Some(RemoteLink {
            store: Box::new(store),
            uploader: Box::new(uploader),
        });
        self
    }

    pub fn without_remote(mut self) -> Self {
        self.remote = None;
        self
    }

    /// Collect the candidate set: the union over every transfer.
    pub fn collect(&self, now: u64) -> (FileSet, Vec<crate::collect::WalkWarning>) {
        let collection = TreeCollector::new().collect_all(&self.config.transfers, now);
        (collection.files, collection.warnings)
    }

    /// Run the full pipeline.
    ///
    /// `now` is the wall-clock time in Unix seconds used by the sampler.
    ///
    /// # Errors
    ///
    /// Returns an error only if the output directory cannot be prepared or
    /// listed. Per-file failures and an unreachable remote are recorded in
    /// the report.
    pub fn run(&self, now: u64, options: SyncOptions) -> Result<RunReport> {
        let mut report = RunReport {
            dry_run: options.dry_run,
            ..RunReport::default()
        };

        let (candidates, warnings) = self.collect(now);
        report.candidates = candidates.len();
        report.warnings = warnings;
        tracing::info!(
            candidates = candidates.len(),
            output = %self.config.output_path.display(),
            "Total files to sync"
        );

        let gateway = TransformGateway::new(
            &self.config.output_path,
            &self.config.transform,
            self.transform.as_ref(),
        );
        let materialization = if options.dry_run {
            gateway.preview(&candidates)?
        } else {
            gateway.materialize(&candidates)?
        };
        record_materialization(&mut report, &materialization);

        let Some(remote) = &self.remote else {
            tracing::info!("No remote configured, skipping reconciliation");
            report.remote_skipped = Some(RemoteSkip::NotConfigured);
            return Ok(report);
        };

        let inventory = match remote.store.list() {
            Ok(inventory) => inventory,
            Err(e) => {
                tracing::warn!(
                    endpoint = %remote.store.endpoint(),
                    error = %e,
                    "Remote inventory unavailable, skipping reconciliation"
                );
                report.remote_skipped = Some(RemoteSkip::Unavailable(e.to_string()));
                return Ok(report);
            }
        };
        tracing::debug!(count = inventory.len(), "Remote inventory");

        let plan = SyncPlan::compute(&materialization.set, &inventory);
        report.plan = plan.clone();
        if options.dry_run {
            for path in &plan.uploads {
                tracing::info!(path = %path.display(), "Would upload");
            }
            for name in &plan.deletes {
                tracing::info!(name = %name, "Would delete remotely");
            }
            return Ok(report);
        }

        self.upload_all(remote, &plan, &mut report);
        self.delete_all(remote, &plan, &mut report);
        Ok(report)
    }

    fn upload_all(&self, remote: &RemoteLink, plan: &SyncPlan, report: &mut RunReport) {
        let total = plan.uploads.len();
        for (idx, path) in plan.uploads.iter().enumerate() {
            tracing::info!(path = %path.display(), index = idx + 1, total, "Uploading file");
            match remote.uploader.upload(path) {
                Ok(()) => report.uploaded += 1,
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Upload failed");
                    report.upload_failed.push(path.clone());
                }
            }
        }
        if total > 0 {
            tracing::info!(uploaded = report.uploaded, failed = report.upload_failed.len(), "Uploaded files");
        }
    }

    fn delete_all(&self, remote: &RemoteLink, plan: &SyncPlan, report: &mut RunReport) {
        if plan.deletes.is_empty() {
            return;
        }
        for name in &plan.deletes {
            tracing::debug!(name = %name, "Deleting remotely");
        }
        match remote.store.delete(&plan.deletes) {
            Ok(deleted) => {
                tracing::info!(
                    requested = plan.deletes.len(),
                    reported = deleted,
                    "Remote files deleted"
                );
                report.deleted = Some(deleted);
            }
            Err(e) => {
                tracing::error!(requested = plan.deletes.len(), error = %e, "Remote delete failed");
                report.delete_error = Some(e.to_string());
            }
        }
    }
}

fn record_materialization(report: &mut RunReport, materialization: &Materialization) {
    report.fresh = materialization.set.fresh.len();
    report.present = materialization.set.present.len();
    report.unsupported = materialization.unsupported.len();
    report.transform_failed = materialization.failed.clone();
    report.duplicates = materialization.duplicates.len();
    report.stale = materialization.stale.clone();
}
