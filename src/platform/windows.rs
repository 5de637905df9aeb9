//! Windows named pipe transport
//!
//! Probes `\\.\pipe\discord-ipc-0` through `-9` and opens the first pipe
//! that exists for read/write. Tokio named pipes use overlapped IO, so
//! reads await instead of the blocking-handle polling the protocol's
//! other clients resort to.

use tokio::net::windows::named_pipe::{ClientOptions, NamedPipeClient};
use tracing::debug;

use super::{CANDIDATE_COUNT, IpcPlatform};
use crate::errors::IpcError;

/// Windows transport using named pipes
pub struct WindowsIpc;

impl IpcPlatform for WindowsIpc {
    type Stream = NamedPipeClient;

    async fn connect() -> Result<Self::Stream, IpcError> {
        for i in 0..CANDIDATE_COUNT {
            let name = format!(r"\\.\pipe\discord-ipc-{}", i);

            match ClientOptions::new().open(&name) {
                Ok(client) => {
                    debug!("connected to IPC pipe {}", name);
                    return Ok(client);
                }
                Err(e) => {
                    debug!("IPC pipe {} unavailable: {}", name, e);
                }
            }
        }

        Err(IpcError::DiscordNotFound)
    }
}
