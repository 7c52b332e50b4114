//! frame CLI
//!
//! Selects photos from local trees, resizes them into an output directory
//! and keeps a networked picture frame in step with that directory.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Sync {
            config,
            dry_run,
            json,
        } => commands::run_sync(&config, dry_run, json),
        Commands::Collect { config } => commands::run_collect(&config),
        Commands::Serve { port, path, bind } => commands::run_serve(&bind, port, &path),
        Commands::Remote {
            host,
            port,
            timeout,
            action,
        } => commands::run_remote(&host, port, timeout, action),
    }
}
