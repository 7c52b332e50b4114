//! Frame server
//!
//! Answers `list` and `del` for a single serving directory. Each accepted
//! connection is handled on its own task: read one line, write one line,
//! close.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::sync::{Semaphore, broadcast};
use tokio::time::timeout;

use crate::client::DEFAULT_PORT;
use crate::protocol::{self, Command};
use crate::{RemoteError, Result};

/// Default maximum number of connections handled at once.
pub const DEFAULT_MAX_CONNECTIONS: usize = 32;

/// Default deadline for reading the request line.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest request line accepted.
const MAX_LINE_BYTES: u64 = 16 * 1024 * 1024;

/// Configuration for [`FrameServer`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_address: SocketAddr,
    /// Directory whose files are listed and deleted.
    pub root: PathBuf,
    /// Maximum number of concurrent connections.
    pub max_connections: usize,
    /// Deadline for receiving the request line.
    pub read_timeout: Duration,
}

impl ServerConfig {
    /// Serve `root` on all interfaces at the default port.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            root: root.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    pub fn bind_address(mut self, addr: SocketAddr) -> Self {
        self.bind_address = addr;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.bind_address.set_port(port);
        self
    }

    pub fn max_connections(mut self, max: usize) -> Self {
        self.max_connections = max.max(1);
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }
}

/// TCP server for the frame's photo directory.
pub struct FrameServer {
    listener: TcpListener,
    config: Arc<ServerConfig>,
    connections: Arc<Semaphore>,
    shutdown_tx: broadcast::Sender<()>,
    shutdown_rx: broadcast::Receiver<()>,
}

impl FrameServer {
    /// Bind the listening socket with address reuse enabled, so a restarted
    /// server can bind again immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket cannot be created or bound.
    pub async fn bind(config: ServerConfig) -> Result<Self> {
        let socket = if config.bind_address.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        socket.set_reuseaddr(true)?;
        socket.bind(config.bind_address)?;
        let listener = socket.listen(1024)?;

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        tracing::info!(
            addr = %listener.local_addr()?,
            root = %config.root.display(),
            "Frame server listening"
        );

        Ok(Self {
            listener,
            connections: Arc::new(Semaphore::new(config.max_connections)),
            config: Arc::new(config),
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Sender that stops [`serve`](Self::serve) when signalled.
    pub fn shutdown_signal(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Accept connections until shutdown is signalled.
    ///
    /// At the connection limit, further clients wait in the listen backlog
    /// until a slot frees up.
    ///
    /// # Errors
    ///
    /// Returns an error if accepting a connection fails.
    pub async fn serve(mut self) -> Result<()> {
        loop {
            let permit = tokio::select! {
                permit = self.connections.clone().acquire_owned() => {
                    permit.map_err(|e| RemoteError::Io(std::io::Error::other(e)))?
                }
                _ = self.shutdown_rx.recv() => break,
            };

            tokio::select! {
                result = self.listener.accept() => {
                    let (stream, peer) = result?;
                    let config = self.config.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, peer, &config).await {
                            tracing::warn!(peer = %peer, error = %e, "Connection failed");
                        }
                        drop(permit);
                    });
                }
                _ = self.shutdown_rx.recv() => break,
            }
        }

        tracing::info!("Frame server shutting down");
        Ok(())
    }
}

async fn handle_connection(stream: TcpStream, peer: SocketAddr, config: &ServerConfig) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader.take(MAX_LINE_BYTES));

    let mut raw = Vec::new();
    let read = timeout(config.read_timeout, reader.read_until(b'\n', &mut raw)).await;
    match read {
        Ok(result) => {
            result?;
        }
        Err(_) => {
            return Err(RemoteError::Timeout {
                command: "read".to_string(),
                after: config.read_timeout,
            });
        }
    }

    let line = String::from_utf8_lossy(&raw);
    let command = Command::parse(&line);
    tracing::info!(peer = %peer, command = command.verb(), "Got command");

    let root = config.root.clone();
    let response = tokio::task::spawn_blocking(move || execute(&command, &root))
        .await
        .map_err(|e| RemoteError::Io(std::io::Error::other(e)))??;

    writer.write_all(response.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.shutdown().await?;
    Ok(())
}

/// Run a command against `root` and produce the response line.
///
/// # Errors
///
/// Returns an error if the serving directory cannot be listed. Individual
/// files that fail to delete are logged and not counted.
pub fn execute(command: &Command, root: &Path) -> Result<String> {
    match command {
        Command::List => {
            let names: Vec<String> = frame_fs::list_regular_files(root)?
                .iter()
                .filter_map(|path| path.file_name())
                .map(|name| name.to_string_lossy().to_string())
                .collect();
            tracing::debug!(root = %root.display(), count = names.len(), "Listing files");
            Ok(protocol::encode_list_response(&names))
        }
        Command::Delete(names) => {
            let mut removed = 0usize;
            for name in names {
                if !protocol::is_plain_name(name) {
                    tracing::warn!(name = %name, "Refusing to delete non-plain name");
                    continue;
                }
                let path = root.join(name);
                match frame_fs::io::remove_if_file(&path) {
                    Ok(true) => {
                        tracing::info!(path = %path.display(), "Deleted file");
                        removed += 1;
                    }
                    Ok(false) => {
                        tracing::debug!(path = %path.display(), "Not a file, skipping");
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to delete file");
                    }
                }
            }
            Ok(removed.to_string())
        }
        Command::Unknown(line) => {
            tracing::debug!(line = %line, "Unknown command");
            Ok(String::new())
        }
    }
}
