//! Remote inventory protocol for frame-sync
//!
//! The picture frame exposes its photo directory through a tiny line
//! protocol: one command per TCP connection, one response line back.
//!
//! ```text
//! client -> server   list\n
//! server -> client   a.jpg\tb.jpg\n
//!
//! client -> server   del\ta.jpg\tz.jpg\n
//! server -> client   1\n
//! ```
//!
//! - [`protocol`]: command and response encoding
//! - [`client`]: blocking client with connect/read/write deadlines
//! - [`server`]: tokio server answering for one serving directory

pub mod client;
pub mod error;
pub mod protocol;
pub mod server;

pub use client::{DEFAULT_PORT, RemoteClient, RemoteStore};
pub use error::{RemoteError, Result};
pub use protocol::{Command, RemoteInventory};
pub use server::{FrameServer, ServerConfig};
