//! WebSocket push transport backed by tokio-tungstenite.
//!
//! Frames travel as JSON text messages of the shape
//! `{"event": "...", "data": {...}}` in both directions. The connection is
//! dialed lazily on first use; a failed dial degrades silently to
//! snapshot-only mode. After a drop, the next `ensure_connected` dials
//! again and re-joins every room previously joined (the server treats
//! repeated joins as idempotent).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use vetsync_core::util::{is_http_url, is_ws_url};

use crate::error::{ClientError, ClientResult};
use crate::transport::{ActorIdentity, PushFrame, Transport, FRAME_BUFFER};

/// Wire shape of a push message.
#[derive(Debug, Deserialize)]
struct WireFrame {
    event: String,
    #[serde(default)]
    data: Value,
}

/// Shared WebSocket transport. Clone-cheap; all clones share one connection.
#[derive(Debug, Clone)]
pub struct WsTransport {
    inner: Arc<WsInner>,
}

#[derive(Debug)]
struct WsInner {
    url: String,
    frames: broadcast::Sender<PushFrame>,
    outbound: Mutex<Option<mpsc::UnboundedSender<String>>>,
    connected: AtomicBool,
    /// Serialized join messages, replayed after every (re)connect.
    joined: Mutex<Vec<String>>,
}

impl WsTransport {
    pub fn new(push_url: &str) -> ClientResult<Self> {
        let url = normalize_push_url(push_url)?;
        let (frames, _) = broadcast::channel(FRAME_BUFFER);
        Ok(Self {
            inner: Arc::new(WsInner {
                url,
                frames,
                outbound: Mutex::new(None),
                connected: AtomicBool::new(false),
                joined: Mutex::new(Vec::new()),
            }),
        })
    }
}

impl Transport for WsTransport {
    fn ensure_connected(&self) {
        let Ok(mut outbound) = self.inner.outbound.lock() else {
            return;
        };
        if outbound.as_ref().is_some_and(|sender| !sender.is_closed()) {
            return;
        }

        let (sender, receiver) = mpsc::unbounded_channel();
        *outbound = Some(sender);
        drop(outbound);
        tokio::spawn(run_connection(Arc::clone(&self.inner), receiver));
    }

    fn join_room(&self, join_event: &str, identity: &ActorIdentity) {
        let message = json!({ "event": join_event, "data": identity.join_payload() }).to_string();
        if let Ok(mut joined) = self.inner.joined.lock() {
            joined.push(message.clone());
        }

        self.ensure_connected();
        if self.inner.connected.load(Ordering::Acquire) {
            self.inner.send_outbound(message);
        }
        // Not yet connected: the join is replayed once the dial completes.
    }

    fn frames(&self) -> broadcast::Receiver<PushFrame> {
        self.inner.frames.subscribe()
    }
}

impl WsInner {
    fn send_outbound(&self, message: String) {
        if let Ok(outbound) = self.outbound.lock() {
            if let Some(sender) = outbound.as_ref() {
                // A closed channel means the connection just dropped; the
                // message is covered by the reconnect replay.
                let _ = sender.send(message);
            }
        }
    }

    fn joined_messages(&self) -> Vec<String> {
        self.joined
            .lock()
            .map(|joined| joined.clone())
            .unwrap_or_default()
    }

    fn mark_disconnected(&self) {
        self.connected.store(false, Ordering::Release);
        if let Ok(mut outbound) = self.outbound.lock() {
            *outbound = None;
        }
    }

    /// Decode one incoming text message and fan it out.
    fn dispatch(&self, text: &str) {
        match serde_json::from_str::<WireFrame>(text) {
            Ok(frame) => {
                let _ = self.frames.send(PushFrame::new(frame.event, frame.data));
            }
            Err(error) => {
                tracing::warn!(%error, "dropping unparseable push frame");
            }
        }
    }
}

async fn run_connection(inner: Arc<WsInner>, mut outbound: mpsc::UnboundedReceiver<String>) {
    let (stream, _) = match connect_async(inner.url.as_str()).await {
        Ok(connected) => connected,
        Err(error) => {
            tracing::warn!(url = %inner.url, %error, "push channel unreachable, staying snapshot-only");
            inner.mark_disconnected();
            return;
        }
    };
    tracing::debug!(url = %inner.url, "push channel connected");
    inner.connected.store(true, Ordering::Release);

    let (mut sink, mut incoming) = stream.split();
    for join in inner.joined_messages() {
        if sink.send(Message::Text(join)).await.is_err() {
            inner.mark_disconnected();
            return;
        }
    }

    loop {
        tokio::select! {
            outgoing = outbound.recv() => match outgoing {
                Some(text) => {
                    if sink.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                None => break,
            },
            received = incoming.next() => match received {
                Some(Ok(Message::Text(text))) => inner.dispatch(&text),
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(error)) => {
                    tracing::warn!(%error, "push channel read failed");
                    break;
                }
            },
        }
    }

    inner.mark_disconnected();
    tracing::debug!(url = %inner.url, "push channel disconnected");
}

/// Normalize a configured push URL to a ws/wss scheme.
///
/// Socket servers commonly advertise `http(s)` endpoints; those map to the
/// matching WebSocket scheme.
pub fn normalize_push_url(raw: &str) -> ClientResult<String> {
    let url = raw.trim().trim_end_matches('/');
    if url.is_empty() {
        return Err(ClientError::Core(vetsync_core::Error::Config(
            "push_url must not be empty".to_string(),
        )));
    }
    if is_ws_url(url) {
        return Ok(url.to_string());
    }
    if is_http_url(url) {
        return Ok(if let Some(rest) = url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else {
            format!("ws://{}", url.trim_start_matches("http://"))
        });
    }
    Err(ClientError::Core(vetsync_core::Error::Config(
        "push_url must include ws://, wss://, http:// or https://".to_string(),
    )))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn normalize_push_url_maps_http_schemes() {
        assert_eq!(
            normalize_push_url("http://localhost:5000/").unwrap(),
            "ws://localhost:5000"
        );
        assert_eq!(
            normalize_push_url("https://push.clinic.example").unwrap(),
            "wss://push.clinic.example"
        );
        assert_eq!(
            normalize_push_url("wss://push.clinic.example").unwrap(),
            "wss://push.clinic.example"
        );
        assert!(normalize_push_url("ftp://push.clinic.example").is_err());
        assert!(normalize_push_url("  ").is_err());
    }

    #[test]
    fn wire_frames_decode_into_push_frames() {
        let transport = WsTransport::new("ws://localhost:5000").unwrap();
        let mut frames = transport.frames();

        transport
            .inner
            .dispatch(r#"{"event": "admin_tip_deleted", "data": {"tipId": 3}}"#);

        let frame = frames.try_recv().unwrap();
        assert_eq!(frame.event, "admin_tip_deleted");
        assert_eq!(frame.payload, json!({"tipId": 3}));
    }

    #[test]
    fn unparseable_wire_frames_are_dropped() {
        let transport = WsTransport::new("ws://localhost:5000").unwrap();
        let mut frames = transport.frames();
        transport.inner.dispatch("not json");
        assert!(frames.try_recv().is_err());
    }
}
