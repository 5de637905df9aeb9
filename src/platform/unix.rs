//! Unix Domain Socket transport
//!
//! Probes `discord-ipc-0` through `discord-ipc-9` in the resolved socket
//! directory and connects to the first socket that exists and accepts.

use tokio::net::UnixStream;
use tracing::debug;

use super::{CANDIDATE_COUNT, IpcPlatform, socket_dir};
use crate::errors::IpcError;

/// Unix transport using Unix Domain Sockets
pub struct UnixIpc;

impl IpcPlatform for UnixIpc {
    type Stream = UnixStream;

    async fn connect() -> Result<Self::Stream, IpcError> {
        let dir = socket_dir();

        for i in 0..CANDIDATE_COUNT {
            let path = dir.join(format!("discord-ipc-{}", i));
            if !path.exists() {
                continue;
            }

            match UnixStream::connect(&path).await {
                Ok(stream) => {
                    debug!("connected to IPC socket {}", path.display());
                    return Ok(stream);
                }
                Err(e) => {
                    // Stale socket file from a dead instance, try the next one
                    debug!("IPC socket {} refused connection: {}", path.display(), e);
                }
            }
        }

        Err(IpcError::DiscordNotFound)
    }
}
