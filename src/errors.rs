//! IPC client error types.

use std::fmt;
use std::io;

/// Errors produced while talking to the local Discord endpoint.
#[derive(Debug)]
pub enum IpcError {
    /// No candidate socket/pipe accepted a connection (Discord not running)
    DiscordNotFound,
    /// Protocol violation while decoding an incoming frame
    MalformedFrame(String),
    /// Operation attempted while no connection is open
    NotConnected,
    /// IO error during communication
    Io(io::Error),
    /// Rich presence payload failed validation
    InvalidPresence(String),
}

impl fmt::Display for IpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpcError::DiscordNotFound => write!(f, "Discord client not found"),
            IpcError::MalformedFrame(msg) => write!(f, "Malformed frame: {}", msg),
            IpcError::NotConnected => write!(f, "Not connected to Discord"),
            IpcError::Io(e) => write!(f, "IO error: {}", e),
            IpcError::InvalidPresence(msg) => write!(f, "Invalid presence: {}", msg),
        }
    }
}

impl std::error::Error for IpcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IpcError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for IpcError {
    fn from(err: io::Error) -> Self {
        IpcError::Io(err)
    }
}
