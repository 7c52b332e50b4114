//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// frame - keep a picture frame stocked with a rotating photo selection
#[derive(Parser, Debug)]
#[command(name = "frame")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write logs to this file (truncated each run)
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Collect, resize and reconcile with the frame
    Sync {
        /// Configuration file
        #[arg(short, long, env = "FRAME_CONFIG", default_value = "frame.toml")]
        config: PathBuf,

        /// Collect and plan only; transform, upload and delete nothing
        #[arg(long)]
        dry_run: bool,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the candidate set, one path per line
    Collect {
        /// Configuration file
        #[arg(short, long, env = "FRAME_CONFIG", default_value = "frame.toml")]
        config: PathBuf,
    },

    /// Serve a photo directory to sync clients
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = frame_remote::DEFAULT_PORT)]
        port: u16,

        /// Directory to list and delete from
        #[arg(long, default_value = ".")]
        path: PathBuf,

        /// Address to bind to
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Send one command to a frame server
    Remote {
        /// Frame host
        #[arg(long, env = "FRAME_HOST", default_value = "localhost")]
        host: String,

        /// Frame port
        #[arg(short, long, default_value_t = frame_remote::DEFAULT_PORT)]
        port: u16,

        /// Connect, read and write deadline in seconds
        #[arg(long, default_value_t = 30)]
        timeout: u64,

        #[command(subcommand)]
        action: RemoteAction,
    },
}

/// One-shot remote commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum RemoteAction {
    /// List files on the frame
    List,

    /// Delete files from the frame
    Del {
        /// Basenames to delete
        #[arg(required = true)]
        names: Vec<String>,
    },
}
