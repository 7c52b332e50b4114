//! Collect command implementation

use std::path::Path;

use frame_core::{RunConfig, TreeCollector};

use crate::error::Result;

/// Print the candidate set, sorted, one path per line.
///
/// Directories that could not be walked are logged; they do not fail the
/// command.
pub fn run_collect(config_path: &Path) -> Result<()> {
    let config = RunConfig::load(config_path)?;
    let collection = TreeCollector::new().collect_all(&config.transfers, frame_core::unix_now());

    for file in &collection.files {
        println!("{}", file.path().display());
    }
    tracing::info!(
        files = collection.files.len(),
        warnings = collection.warnings.len(),
        "Collected candidates"
    );
    Ok(())
}
