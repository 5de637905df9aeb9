//! Connection state machine and background reader
//!
//! One [`DiscordRpcClient`] drives one logical session: connect and
//! handshake on the caller's task, then a dedicated background task owns
//! the read half and demultiplexes incoming frames into listener
//! callbacks. Send-style operations run on the caller's task and are
//! serialized through a writer mutex so concurrent senders cannot
//! interleave partial frames.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use serde_json::{Value, json};
use tokio::io::{AsyncWriteExt, ReadHalf, WriteHalf};
use tokio::sync::{Mutex, watch};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::IpcError;
use crate::events::{EventListener, dispatch};
use crate::platform::{IpcPlatform, PlatformIpc};
use crate::presence::RichPresence;
use crate::protocol::{OpCode, read_frame};

type PipeReader = ReadHalf<<PlatformIpc as IpcPlatform>::Stream>;
type PipeWriter = WriteHalf<<PlatformIpc as IpcPlatform>::Stream>;

/// State shared between the caller-facing client and the reader task.
///
/// The connected flag and the listener slot are the only cross-task
/// state: the flag is read by every send operation and the reader loop,
/// the listener is read once per callback and the `Arc` passed by value.
struct Shared {
    connected: AtomicBool,
    listener: RwLock<Option<Arc<dyn EventListener>>>,
    writer: Mutex<Option<PipeWriter>>,
    shutdown_tx: watch::Sender<bool>,
}

impl Shared {
    fn listener(&self) -> Option<Arc<dyn EventListener>> {
        self.listener.read().clone()
    }

    fn notify_io_error(&self, error: &IpcError) {
        match self.listener() {
            Some(listener) => listener.on_io_error(error),
            // Best-effort protocol: without a listener the log is all we do
            None => warn!("IPC fault with no listener registered: {}", error),
        }
    }

    /// Drop the transport without firing notifications. Keeps the
    /// connected flag and the transport lifetime 1:1 on the graceful
    /// end-of-stream path.
    async fn drop_transport(&self) {
        self.connected.store(false, Ordering::SeqCst);
        self.shutdown_tx.send_replace(true);
        if let Some(mut writer) = self.writer.lock().await.take() {
            if let Err(e) = writer.shutdown().await {
                debug!("error shutting down pipe writer: {}", e);
            }
        }
    }

    /// Tear the connection down and fire the closed notification exactly
    /// once, no matter how many paths race here.
    async fn force_close(&self) {
        if !self.connected.swap(false, Ordering::SeqCst) {
            return;
        }
        self.shutdown_tx.send_replace(true);
        if let Some(mut writer) = self.writer.lock().await.take() {
            if let Err(e) = writer.shutdown().await {
                debug!("error shutting down pipe writer: {}", e);
            }
        }
        if let Some(listener) = self.listener() {
            listener.on_close();
        }
    }
}

/// Client for Discord's local rich presence IPC endpoint.
pub struct DiscordRpcClient {
    app_id: String,
    shared: Arc<Shared>,
}

impl DiscordRpcClient {
    /// Create a disconnected client for the given Discord application id.
    pub fn new(app_id: impl Into<String>) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            app_id: app_id.into(),
            shared: Arc::new(Shared {
                connected: AtomicBool::new(false),
                listener: RwLock::new(None),
                writer: Mutex::new(None),
                shutdown_tx,
            }),
        }
    }

    /// Create a disconnected client with an event listener installed.
    pub fn with_listener(app_id: impl Into<String>, listener: Arc<dyn EventListener>) -> Self {
        let client = Self::new(app_id);
        client.set_listener(Some(listener));
        client
    }

    /// Install or remove the event listener. Takes effect for the next
    /// callback; in-flight callbacks keep the listener they already read.
    pub fn set_listener(&self, listener: Option<Arc<dyn EventListener>>) {
        *self.shared.listener.write() = listener;
    }

    /// Whether a connection to Discord is currently open.
    pub fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::SeqCst)
    }

    /// Open a connection to Discord.
    ///
    /// Discovers the endpoint for the current platform, sends the
    /// handshake, and starts the background reader. It is the caller's
    /// responsibility to check [`is_connected`](Self::is_connected)
    /// before calling this; connecting twice is not guarded here.
    ///
    /// Discovery failure returns [`IpcError::DiscordNotFound`] directly.
    /// A handshake send failure is reported to the listener, closes the
    /// connection (firing `on_close`), and is returned to the caller.
    pub async fn connect(&self) -> Result<(), IpcError> {
        let stream = PlatformIpc::connect().await?;
        let (reader, writer) = tokio::io::split(stream);
        *self.shared.writer.lock().await = Some(writer);

        let handshake = json!({"v": 1, "client_id": self.app_id});
        if let Err(e) = self.write_packet(OpCode::Handshake, handshake).await {
            self.shared.notify_io_error(&e);
            self.shared.drop_transport().await;
            if let Some(listener) = self.shared.listener() {
                listener.on_close();
            }
            return Err(e);
        }

        self.shared.connected.store(true, Ordering::SeqCst);
        self.shared.shutdown_tx.send_replace(false);

        let shared = Arc::clone(&self.shared);
        let shutdown_rx = self.shared.shutdown_tx.subscribe();
        tokio::spawn(read_loop(shared, reader, shutdown_rx));

        Ok(())
    }

    /// Send a command payload as a MESSAGE frame.
    ///
    /// A fresh nonce is injected into the payload before encoding. Fails
    /// with [`IpcError::NotConnected`] outside the connected state. A
    /// write fault is reported through the listener's `on_io_error` but
    /// does not itself tear the connection down; the reader observes the
    /// broken stream independently.
    pub async fn send_command(&self, payload: Value) -> Result<(), IpcError> {
        if !self.is_connected() {
            return Err(IpcError::NotConnected);
        }

        if let Err(e) = self.write_packet(OpCode::Message, payload).await {
            warn!("failed to send IPC command: {}", e);
            self.shared.notify_io_error(&e);
        }
        Ok(())
    }

    /// Publish a rich presence status.
    pub async fn send_presence(&self, presence: &RichPresence) -> Result<(), IpcError> {
        self.send_command(json!({
            "cmd": "SET_ACTIVITY",
            "args": {
                "pid": std::process::id(),
                "activity": presence,
            },
        }))
        .await
    }

    /// Respond to an activity join request from the given user.
    pub async fn respond(&self, user_id: &str, accept: bool) -> Result<(), IpcError> {
        let cmd = if accept {
            "SEND_ACTIVITY_JOIN_INVITE"
        } else {
            "CLOSE_ACTIVITY_REQUEST"
        };
        self.send_command(json!({"cmd": cmd, "user_id": user_id}))
            .await
    }

    /// Close the connection to Discord.
    ///
    /// Fails with [`IpcError::NotConnected`] when already disconnected;
    /// closing twice is not swallowed. Fires the `on_close` notification.
    pub async fn close(&self) -> Result<(), IpcError> {
        if !self.is_connected() {
            return Err(IpcError::NotConnected);
        }
        self.shared.force_close().await;
        Ok(())
    }

    /// Inject a nonce, encode, and write one frame through the writer
    /// mutex.
    async fn write_packet(&self, opcode: OpCode, mut payload: Value) -> Result<(), IpcError> {
        if let Some(object) = payload.as_object_mut() {
            object.insert(
                "nonce".to_string(),
                Value::String(Uuid::new_v4().to_string()),
            );
        }
        let bytes = crate::protocol::encode(opcode, &payload)?;

        let mut guard = self.shared.writer.lock().await;
        let writer = guard.as_mut().ok_or(IpcError::NotConnected)?;
        writer.write_all(&bytes).await?;
        writer.flush().await?;
        Ok(())
    }
}

/// Background reader: sole reader of the transport for the lifetime of
/// the connected state.
///
/// Per-frame outcomes: graceful end-of-stream stops the loop silently;
/// a CLOSE frame runs the close path (disconnect plus `on_close`); any
/// other frame goes to event dispatch; a stream fault fires
/// `on_io_error` and then the close path. The shutdown channel makes a
/// blocked read return promptly when the connection is closed from
/// another task.
async fn read_loop(
    shared: Arc<Shared>,
    mut reader: PipeReader,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        if !shared.connected.load(Ordering::SeqCst) {
            break;
        }

        let frame = tokio::select! {
            _ = shutdown_rx.changed() => break,
            frame = read_frame(&mut reader) => frame,
        };

        match frame {
            Ok(None) => {
                debug!("IPC stream ended, disconnecting");
                shared.drop_transport().await;
                break;
            }
            Ok(Some(packet)) => match packet.opcode {
                OpCode::Close => {
                    debug!("CLOSE frame received");
                    shared.force_close().await;
                    break;
                }
                OpCode::Handshake | OpCode::Message => {
                    if let Some(listener) = shared.listener() {
                        dispatch(&packet.payload, listener.as_ref());
                    }
                }
            },
            Err(e) => {
                shared.notify_io_error(&e);
                shared.force_close().await;
                break;
            }
        }
    }

    debug!("IPC reader task stopped");
}
