//! rpclink - Discord rich presence IPC client
//!
//! Connects to the local Discord client over its IPC endpoint (a Unix
//! domain socket on POSIX systems, a named pipe on Windows), performs the
//! protocol handshake, and exchanges length-prefixed JSON frames: rich
//! presence updates out, lifecycle and activity events in.
//!
//! # Architecture
//! - `protocol`: wire frame encoding/decoding (opcode + length-prefixed JSON)
//! - `platform`: endpoint discovery and connection per platform
//! - `client`: connection lifecycle, background reader, command senders
//! - `events`: typed dispatch of incoming events to a listener
//! - `presence`: the rich presence payload model and builder
//!
//! # Example
//! ```no_run
//! use rpclink::{DiscordRpcClient, RichPresence};
//!
//! # async fn run() -> Result<(), rpclink::IpcError> {
//! let client = DiscordRpcClient::new("1024012350000000000");
//! client.connect().await?;
//!
//! let presence = RichPresence::builder()
//!     .details("In a match")
//!     .state("Ranked")
//!     .build()?;
//! client.send_presence(&presence).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod errors;
pub mod events;
pub mod platform;
pub mod presence;
pub mod protocol;

pub use client::DiscordRpcClient;
pub use errors::IpcError;
pub use events::{ErrorEvent, EventListener, User};
pub use presence::{RichPresence, RichPresenceBuilder};
pub use protocol::{OpCode, Packet};
