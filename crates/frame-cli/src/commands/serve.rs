//! Serve command implementation

use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use frame_remote::{FrameServer, ServerConfig};

use crate::error::{CliError, Result};

/// Serve `path` until interrupted.
pub fn run_serve(bind: &str, port: u16, path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(CliError::user(format!(
            "Serving directory does not exist: {}",
            path.display()
        )));
    }
    let ip: IpAddr = bind
        .parse()
        .map_err(|_| CliError::user(format!("Invalid bind address: {bind}")))?;
    let config = ServerConfig::new(path).bind_address(SocketAddr::new(ip, port));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let server = FrameServer::bind(config).await?;
        let shutdown = server.shutdown_signal();

        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupted");
                let _ = shutdown.send(());
            }
        });

        server.serve().await?;
        Ok::<(), CliError>(())
    })
}
