//! Push-channel transport abstraction.
//!
//! The connection is process-wide shared state: installed once, never
//! proactively closed. Components hold an `Arc<dyn Transport>` capability
//! and add/remove only their own listeners; reconnection policy belongs to
//! the transport implementation, not to subscribers.

use std::sync::{Arc, Mutex, OnceLock};

use serde_json::{json, Value};
use tokio::sync::broadcast;

/// Frames buffered per receiver before the oldest are dropped. A lagged
/// receiver treats the loss as a missed hint and re-fetches.
pub const FRAME_BUFFER: usize = 256;

/// One named push message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushFrame {
    pub event: String,
    pub payload: Value,
}

impl PushFrame {
    pub fn new(event: impl Into<String>, payload: Value) -> Self {
        Self {
            event: event.into(),
            payload,
        }
    }
}

/// Who is joining a room; carried in the room-join message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorIdentity {
    pub actor_id: String,
    pub actor_name: String,
}

impl ActorIdentity {
    pub fn new(actor_id: impl Into<String>, actor_name: impl Into<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
            actor_name: actor_name.into(),
        }
    }

    /// Payload of the room-join message.
    #[must_use]
    pub fn join_payload(&self) -> Value {
        json!({ "actorId": self.actor_id, "actorName": self.actor_name })
    }
}

/// The seam between subscribers and the underlying push connection.
///
/// Implementations never raise on an unreachable channel; handlers simply
/// stop firing and the caller degrades to snapshot-only freshness.
pub trait Transport: Send + Sync {
    /// Trigger a connection if one is not already up. Failure is silent.
    fn ensure_connected(&self);

    /// Emit a room-join message once connected.
    fn join_room(&self, join_event: &str, identity: &ActorIdentity);

    /// A fresh receiver over the shared frame stream.
    fn frames(&self) -> broadcast::Receiver<PushFrame>;
}

static SHARED: OnceLock<Arc<dyn Transport>> = OnceLock::new();

/// Install the process-wide transport. Returns `false` when one is already
/// installed (the first installation wins).
pub fn install(transport: Arc<dyn Transport>) -> bool {
    SHARED.set(transport).is_ok()
}

/// The process-wide transport, when installed.
pub fn shared() -> Option<Arc<dyn Transport>> {
    SHARED.get().cloned()
}

/// In-process transport used by tests and demos: frames are emitted
/// directly, joins are recorded for inspection.
#[derive(Debug)]
pub struct ChannelTransport {
    frames: broadcast::Sender<PushFrame>,
    joined: Mutex<Vec<(String, ActorIdentity)>>,
}

impl Default for ChannelTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelTransport {
    #[must_use]
    pub fn new() -> Self {
        let (frames, _) = broadcast::channel(FRAME_BUFFER);
        Self {
            frames,
            joined: Mutex::new(Vec::new()),
        }
    }

    /// Emit a frame to every subscriber.
    pub fn emit(&self, event: impl Into<String>, payload: Value) {
        // send only errors when no receiver exists, which is fine here.
        let _ = self.frames.send(PushFrame::new(event, payload));
    }

    /// Rooms joined so far, in join order.
    pub fn joined_rooms(&self) -> Vec<String> {
        self.joined
            .lock()
            .map(|joined| joined.iter().map(|(event, _)| event.clone()).collect())
            .unwrap_or_default()
    }
}

impl Transport for ChannelTransport {
    fn ensure_connected(&self) {}

    fn join_room(&self, join_event: &str, identity: &ActorIdentity) {
        if let Ok(mut joined) = self.joined.lock() {
            joined.push((join_event.to_string(), identity.clone()));
        }
    }

    fn frames(&self) -> broadcast::Receiver<PushFrame> {
        self.frames.subscribe()
    }
}
