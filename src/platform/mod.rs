//! Platform-specific endpoint transports
//!
//! Discord exposes its IPC endpoint differently per platform:
//! - Unix: a Unix Domain Socket in the runtime/temp directory
//! - Windows: a named pipe
//!
//! Both variants implement [`IpcPlatform`]; the [`PlatformIpc`] alias
//! selects the right one for the host so call sites need no conditional
//! compilation.

use std::future::Future;
use std::path::PathBuf;

use parking_lot::RwLock;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::errors::IpcError;

/// Number of candidate endpoints probed before giving up. Discord may run
/// multiple instances, each claiming the next `discord-ipc-<n>` suffix.
pub const CANDIDATE_COUNT: u32 = 10;

/// Environment variables consulted for the socket directory, in
/// precedence order. The first one holding a non-empty value wins.
pub const SOCKET_DIR_VARS: [&str; 4] = ["XDG_RUNTIME_DIR", "TMPDIR", "TMP", "TEMP"];

/// Fallback socket directory when no environment variable is set.
pub const SOCKET_DIR_FALLBACK: &str = "/tmp";

static SOCKET_DIR_OVERRIDE: RwLock<Option<PathBuf>> = RwLock::new(None);

/// Platform-specific IPC transport trait
///
/// Each platform provides discovery and connection for its endpoint kind;
/// everything past connection happens over the uniform `Stream`.
pub trait IpcPlatform: Send + Sync + 'static {
    /// The connected byte stream type for this platform
    type Stream: AsyncRead + AsyncWrite + Send + Unpin + 'static;

    /// Probe the candidate endpoints in ascending order and connect to
    /// the first one that accepts.
    ///
    /// Fails with [`IpcError::DiscordNotFound`] when none of the
    /// candidates are reachable.
    fn connect() -> impl Future<Output = Result<Self::Stream, IpcError>> + Send;
}

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
pub use unix::UnixIpc;
#[cfg(windows)]
pub use windows::WindowsIpc;

/// Transport implementation for the current platform
#[cfg(unix)]
pub type PlatformIpc = UnixIpc;
#[cfg(windows)]
pub type PlatformIpc = WindowsIpc;

/// Override the directory probed for `discord-ipc-*` sockets.
///
/// Takes precedence over the environment chain. Intended for tests and
/// sandboxed deployments where Discord's socket lives in a non-standard
/// location. Has no effect on Windows, where pipe names are fixed.
pub fn set_socket_dir_override(dir: impl Into<PathBuf>) {
    *SOCKET_DIR_OVERRIDE.write() = Some(dir.into());
}

/// Clear a previously set socket directory override.
pub fn clear_socket_dir_override() {
    *SOCKET_DIR_OVERRIDE.write() = None;
}

/// Resolve the socket directory from the process environment.
pub(crate) fn socket_dir() -> PathBuf {
    if let Some(dir) = SOCKET_DIR_OVERRIDE.read().clone() {
        return dir;
    }
    resolve_socket_dir_from(|name| std::env::var(name).ok())
}

/// Resolve the socket directory against an arbitrary variable lookup.
///
/// Split out from [`socket_dir`] so the precedence order is testable
/// without mutating the process environment.
pub fn resolve_socket_dir_from<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    for var in SOCKET_DIR_VARS {
        if let Some(dir) = lookup(var) {
            if !dir.is_empty() {
                return PathBuf::from(dir);
            }
        }
    }
    PathBuf::from(SOCKET_DIR_FALLBACK)
}
