//! Typed dispatch of incoming event frames
//!
//! MESSAGE payloads carry an envelope `{"evt": <name or null>, "data": {..}}`.
//! A non-null `evt` is routed to the matching [`EventListener`] callback;
//! unknown names are ignored so newer Discord builds stay compatible, and
//! an absent `evt` (a bare command acknowledgement) produces nothing.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::errors::IpcError;

/// User record Discord reports in READY and ACTIVITY_JOIN_REQUEST events.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub discriminator: String,
    pub avatar: Option<String>,
}

/// Payload of an ERROR event from Discord.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEvent {
    pub code: i32,
    pub message: String,
}

/// Listener for Discord events
///
/// All methods default to no-ops; implement only the ones you care about.
/// Callbacks run on the connection's background reader task, so keep them
/// short or hand off to a channel.
pub trait EventListener: Send + Sync {
    /// Fired when Discord finishes connecting the client
    fn on_ready(&self, _user: User) {}

    /// Fired for an ERROR event from Discord, may be followed by
    /// [`EventListener::on_close`]
    fn on_error(&self, _event: ErrorEvent) {}

    /// Fired for a transport fault (send failure or a broken read stream),
    /// may be followed by [`EventListener::on_close`]
    fn on_io_error(&self, _error: &IpcError) {}

    /// Fired when the connection is closed, whether by [`close`] or by a
    /// CLOSE frame from Discord
    ///
    /// [`close`]: crate::client::DiscordRpcClient::close
    fn on_close(&self) {}

    fn on_activity_join(&self, _secret: String) {}
    fn on_activity_spectate(&self, _secret: String) {}
    fn on_activity_join_request(&self, _user: User) {}
}

/// Route a decoded MESSAGE payload to the listener.
pub(crate) fn dispatch(payload: &Value, listener: &dyn EventListener) {
    let Some(evt) = payload.get("evt").and_then(Value::as_str) else {
        return;
    };
    let data = payload.get("data").cloned().unwrap_or(Value::Null);

    match evt {
        "READY" => match parse_user(&data) {
            Some(user) => listener.on_ready(user),
            None => debug!("dropping READY event with malformed user record"),
        },
        "ERROR" => match serde_json::from_value::<ErrorEvent>(data) {
            Ok(event) => listener.on_error(event),
            Err(e) => debug!("dropping malformed ERROR event: {}", e),
        },
        "ACTIVITY_JOIN" => match parse_secret(&data) {
            Some(secret) => listener.on_activity_join(secret),
            None => debug!("dropping ACTIVITY_JOIN event without secret"),
        },
        "ACTIVITY_SPECTATE" => match parse_secret(&data) {
            Some(secret) => listener.on_activity_spectate(secret),
            None => debug!("dropping ACTIVITY_SPECTATE event without secret"),
        },
        "ACTIVITY_JOIN_REQUEST" => match parse_user(&data) {
            Some(user) => listener.on_activity_join_request(user),
            None => debug!("dropping ACTIVITY_JOIN_REQUEST event with malformed user record"),
        },
        other => {
            // Forward compatibility: newer event names are not an error
            debug!("ignoring unknown event {}", other);
        }
    }
}

fn parse_user(data: &Value) -> Option<User> {
    serde_json::from_value(data.get("user")?.clone()).ok()
}

fn parse_secret(data: &Value) -> Option<String> {
    Some(data.get("secret")?.as_str()?.to_string())
}
