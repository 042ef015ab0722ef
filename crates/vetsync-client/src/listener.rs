//! Event stream listener: room scoping, payload decoding, and the
//! per-view subscription handle.
//!
//! Decoding is tolerant by construction: unknown event names are ignored,
//! matching names with malformed payloads are dropped and logged, and a
//! lagged receiver downgrades to a re-fetch hint. Nothing here may panic
//! into the caller's render path.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use vetsync_core::models::{ChangeEvent, LiveRecord, RecordId};

use crate::error::{ClientError, ClientResult};
use crate::transport::{ActorIdentity, PushFrame, Transport};

/// What a decoded push frame asks of the live list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushUpdate<R> {
    /// Patch the list with this change event.
    Change(ChangeEvent<R>),
    /// The payload cannot patch the list locally (e.g. read-state flips);
    /// schedule the authoritative re-fetch instead.
    Refresh,
}

/// Maps named push frames onto change events for one content type.
pub trait PushDecode: LiveRecord + DeserializeOwned {
    /// `None` when the event name does not belong to this content type;
    /// `Err` when it does but the payload is malformed.
    fn decode(frame: &PushFrame) -> Option<ClientResult<PushUpdate<Self>>>;
}

impl PushDecode for vetsync_core::models::PetTip {
    fn decode(frame: &PushFrame) -> Option<ClientResult<PushUpdate<Self>>> {
        let actor = actor_name(&frame.payload);
        match frame.event.as_str() {
            "admin_tip_created" => Some(
                record_field(&frame.payload, "tip")
                    .map(|tip| PushUpdate::Change(ChangeEvent::created(tip, actor))),
            ),
            "admin_tip_updated" => Some(
                record_field(&frame.payload, "tip")
                    .map(|tip| PushUpdate::Change(ChangeEvent::updated(tip, actor))),
            ),
            "admin_tip_deleted" => Some(
                id_field(&frame.payload, &["tipId", "id"])
                    .map(|id| PushUpdate::Change(ChangeEvent::deleted(id, actor))),
            ),
            _ => None,
        }
    }
}

impl PushDecode for vetsync_core::models::Video {
    fn decode(frame: &PushFrame) -> Option<ClientResult<PushUpdate<Self>>> {
        let actor = actor_name(&frame.payload);
        match frame.event.as_str() {
            "admin_video_created" | "new_video" => Some(
                record_field(&frame.payload, "video")
                    .map(|video| PushUpdate::Change(ChangeEvent::created(video, actor))),
            ),
            "admin_video_updated" | "video_updated" => Some(
                record_field(&frame.payload, "video")
                    .map(|video| PushUpdate::Change(ChangeEvent::updated(video, actor))),
            ),
            "admin_video_deleted" | "video_deleted" => Some(
                id_field(&frame.payload, &["videoId", "dbId", "id"])
                    .map(|id| PushUpdate::Change(ChangeEvent::deleted(id, actor))),
            ),
            _ => None,
        }
    }
}

impl PushDecode for vetsync_core::models::ForumPost {
    fn decode(frame: &PushFrame) -> Option<ClientResult<PushUpdate<Self>>> {
        match frame.event.as_str() {
            "new_forum_post" => Some(
                record_field(&frame.payload, "post")
                    .map(|post| PushUpdate::Change(ChangeEvent::created(post, None))),
            ),
            "delete_forum_post" => Some(
                id_field(&frame.payload, &["postId", "id"])
                    .map(|id| PushUpdate::Change(ChangeEvent::deleted(id, None))),
            ),
            _ => None,
        }
    }
}

impl PushDecode for vetsync_core::models::Notification {
    fn decode(frame: &PushFrame) -> Option<ClientResult<PushUpdate<Self>>> {
        match frame.event.as_str() {
            "new_notification" => Some(
                record_field(&frame.payload, "notification")
                    .map(|notification| PushUpdate::Change(ChangeEvent::created(notification, None))),
            ),
            "notification_deleted" => Some(
                id_field(&frame.payload, &["notificationId", "id"])
                    .map(|id| PushUpdate::Change(ChangeEvent::deleted(id, None))),
            ),
            // Read-state flips carry no full record; the snapshot re-fetch
            // reconciles them.
            "notification_read" | "all_read" => Some(Ok(PushUpdate::Refresh)),
            _ => None,
        }
    }
}

/// Extract the record payload, either wrapped under `key` or sent bare.
fn record_field<R: DeserializeOwned>(payload: &Value, key: &str) -> ClientResult<R> {
    let value = payload.get(key).cloned().unwrap_or_else(|| payload.clone());
    serde_json::from_value(value)
        .map_err(|error| ClientError::InvalidPayload(format!("push record: {error}")))
}

/// Extract a record id under the first matching key (numeric or numeric string).
fn id_field(payload: &Value, keys: &[&str]) -> ClientResult<RecordId> {
    for key in keys {
        let Some(value) = payload.get(key) else {
            continue;
        };
        if let Some(id) = value.as_i64() {
            return Ok(RecordId(id));
        }
        if let Some(raw) = value.as_str() {
            return raw.parse::<RecordId>().map_err(ClientError::Core);
        }
    }
    Err(ClientError::InvalidPayload(format!(
        "push payload is missing an id ({})",
        keys.join("/")
    )))
}

fn actor_name(payload: &Value) -> Option<String> {
    payload
        .get("adminName")
        .or_else(|| payload.get("actorName"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// A live subscription; dropping it tears the listening task down so no
/// handler ever fires into a dead view.
#[derive(Debug)]
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Join the content type's room and forward decoded updates into `sink`
/// until the subscription is dropped or the sink closes.
pub fn subscribe<R: PushDecode>(
    transport: &Arc<dyn Transport>,
    identity: &ActorIdentity,
    sink: mpsc::UnboundedSender<PushUpdate<R>>,
) -> Subscription {
    transport.ensure_connected();
    transport.join_room(R::KIND.join_event(), identity);

    let mut frames = transport.frames();
    let task = tokio::spawn(async move {
        loop {
            match frames.recv().await {
                Ok(frame) => match R::decode(&frame) {
                    Some(Ok(update)) => {
                        if sink.send(update).is_err() {
                            break;
                        }
                    }
                    Some(Err(error)) => {
                        tracing::warn!(event = %frame.event, %error, "dropping malformed push payload");
                    }
                    None => {}
                },
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "push receiver lagged, scheduling re-fetch");
                    if sink.send(PushUpdate::Refresh).is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    Subscription { task }
}
