//! Blocking protocol client

use std::io::{ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::protocol::{self, Command, RemoteInventory};
use crate::{RemoteError, Result};

/// Port the frame server listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 9999;

/// Default deadline for connecting and for each read or write.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest response the client will buffer.
const MAX_RESPONSE_BYTES: u64 = 64 * 1024 * 1024;

/// Access to the remote photo store.
///
/// Implementations must report failure rather than an empty inventory when
/// the remote cannot be reached.
pub trait RemoteStore {
    /// Case-folded basenames currently on the remote.
    fn list(&self) -> Result<RemoteInventory>;

    /// Delete `names` in one batch, returning how many the remote removed.
    fn delete(&self, names: &[String]) -> Result<usize>;

    /// Human-readable endpoint for logs.
    fn endpoint(&self) -> String;
}

/// Client for the frame server's line protocol.
///
/// Every command opens its own connection.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    host: String,
    port: u16,
    timeout: Duration,
}

impl RemoteClient {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the connect, read and write deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send one command and return the first response line.
    ///
    /// # Errors
    ///
    /// Returns an error if the host does not resolve, the connection fails,
    /// an exchange exceeds the deadline, or the connection closes before a
    /// complete line arrives.
    pub fn send(&self, command: &Command) -> Result<String> {
        let mut stream = self.connect()?;
        stream.set_read_timeout(Some(self.timeout))?;
        stream.set_write_timeout(Some(self.timeout))?;

        let request = command.encode();
        tracing::debug!(endpoint = %self.endpoint(), request = %request, "Sending remote command");

        let mut line = request.into_bytes();
        line.push(b'\n');
        stream
            .write_all(&line)
            .and_then(|()| stream.flush())
            .map_err(|e| self.map_io(command, e))?;

        // The server closes the connection after its single line
        let mut received = Vec::new();
        stream
            .take(MAX_RESPONSE_BYTES)
            .read_to_end(&mut received)
            .map_err(|e| self.map_io(command, e))?;

        let text = String::from_utf8_lossy(&received);
        // A missing terminator means the server gave up before answering
        let Some((response, _)) = text.split_once('\n') else {
            return Err(RemoteError::Malformed {
                command: command.verb().to_string(),
                response: text.to_string(),
            });
        };
        tracing::debug!(endpoint = %self.endpoint(), bytes = received.len(), "Received remote response");
        Ok(response.to_string())
    }

    fn connect(&self) -> Result<TcpStream> {
        let addrs: Vec<SocketAddr> = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|_| RemoteError::Resolve {
                host: self.host.clone(),
                port: self.port,
            })?
            .collect();

        let mut last_error = None;
        for addr in &addrs {
            match TcpStream::connect_timeout(addr, self.timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_error = Some(e),
            }
        }

        match last_error {
            Some(source) => Err(RemoteError::Connect {
                addr: self.endpoint(),
                source,
            }),
            None => Err(RemoteError::Resolve {
                host: self.host.clone(),
                port: self.port,
            }),
        }
    }

    fn map_io(&self, command: &Command, e: std::io::Error) -> RemoteError {
        match e.kind() {
            ErrorKind::TimedOut | ErrorKind::WouldBlock => RemoteError::Timeout {
                command: command.verb().to_string(),
                after: self.timeout,
            },
            _ => RemoteError::Io(e),
        }
    }
}

impl RemoteStore for RemoteClient {
    fn list(&self) -> Result<RemoteInventory> {
        let response = self.send(&Command::List)?;
        let names = protocol::parse_list_response(&response);
        for name in names.reported() {
            tracing::debug!(name = %name, "Remote file");
        }
        tracing::debug!(count = names.len(), "Listed remote files");
        Ok(names)
    }

    fn delete(&self, names: &[String]) -> Result<usize> {
        if names.is_empty() {
            return Ok(0);
        }
        let response = self.send(&Command::Delete(names.to_vec()))?;
        protocol::parse_delete_response(&response)
    }

    fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
