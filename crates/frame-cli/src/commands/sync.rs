//! Sync command implementation

use std::path::Path;

use colored::Colorize;

use frame_core::{RemoteSkip, RunConfig, RunReport, SyncEngine, SyncOptions};

use crate::error::Result;

/// Run the full pipeline for the configuration at `config_path`.
///
/// Per-file failures are reported but do not fail the command.
pub fn run_sync(config_path: &Path, dry_run: bool, json: bool) -> Result<()> {
    let config = RunConfig::load(config_path)?;

    if !json {
        let verb = if dry_run { "Planning" } else { "Syncing" };
        println!(
            "{} {} {} transfer(s) into {}",
            "=>".blue().bold(),
            verb,
            config.transfers.len(),
            config.output_path.display().to_string().cyan()
        );
    }

    let engine = SyncEngine::from_config(&config);
    let report = engine.run(frame_core::unix_now(), SyncOptions { dry_run })?;

    if json {
        println!("{}", report.to_json()?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &RunReport) {
    let would = if report.dry_run { "would be " } else { "" };

    println!("   {} candidates", report.candidates);
    println!(
        "   {} {}resized, {} already present",
        report.fresh, would, report.present
    );
    if report.unsupported > 0 {
        println!("   {} {} skipped (not an image type)", "!".yellow(), report.unsupported);
    }
    for path in &report.transform_failed {
        println!("   {} transform failed: {}", "!".red(), path.display());
    }
    if !report.stale.is_empty() {
        println!("   {} stale output(s) {}removed", report.stale.len(), would);
    }
    for warning in &report.warnings {
        println!(
            "   {} could not read {}: {}",
            "!".yellow(),
            warning.path.display(),
            warning.message
        );
    }

    match &report.remote_skipped {
        Some(RemoteSkip::NotConfigured) => {
            println!("{} No remote configured.", "OK".green().bold());
            return;
        }
        Some(RemoteSkip::Unavailable(reason)) => {
            println!(
                "{} Remote unavailable, nothing uploaded or deleted: {}",
                "SKIPPED".yellow().bold(),
                reason
            );
            return;
        }
        None => {}
    }

    if report.dry_run {
        for path in &report.plan.uploads {
            println!("   {} {}", "+".green(), path.display());
        }
        for name in &report.plan.deletes {
            println!("   {} {}", "-".red(), name);
        }
        println!(
            "{} Would upload {} and delete {} file(s).",
            "[dry-run]".yellow(),
            report.plan.uploads.len(),
            report.plan.deletes.len()
        );
        return;
    }

    for path in &report.upload_failed {
        println!("   {} upload failed: {}", "!".red(), path.display());
    }
    if let Some(error) = &report.delete_error {
        println!("   {} delete failed: {}", "!".red(), error);
    }

    let status = if report.is_clean() {
        "OK".green().bold()
    } else {
        "PARTIAL".yellow().bold()
    };
    println!(
        "{} Uploaded {} of {}, deleted {} of {} requested.",
        status,
        report.uploaded,
        report.plan.uploads.len(),
        report.deleted.unwrap_or(0),
        report.plan.deletes.len()
    );
}
