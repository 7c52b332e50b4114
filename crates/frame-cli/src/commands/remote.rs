//! One-shot remote client command

use std::time::Duration;

use colored::Colorize;

use frame_remote::{RemoteClient, RemoteStore};

use crate::cli::RemoteAction;
use crate::error::Result;

pub fn run_remote(host: &str, port: u16, timeout: u64, action: RemoteAction) -> Result<()> {
    let client = RemoteClient::new(host, port).with_timeout(Duration::from_secs(timeout));

    match action {
        RemoteAction::List => {
            let names = client.list()?;
            for name in names.reported() {
                println!("{name}");
            }
            tracing::info!(endpoint = %client.endpoint(), count = names.len(), "Listed remote files");
        }
        RemoteAction::Del { names } => {
            let deleted = client.delete(&names)?;
            println!(
                "{} Deleted {} of {} requested.",
                "OK".green().bold(),
                deleted,
                names.len()
            );
        }
    }
    Ok(())
}
