//! Change events pushed by the backend when a mutation commits.

use std::fmt;

use chrono::{DateTime, Utc};

use super::record::RecordId;

/// What a change event did, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        })
    }
}

/// The mutation a change event describes. Created/updated carry the full
/// record payload; deletes carry only the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeAction<R> {
    Created(R),
    Updated(R),
    Deleted(RecordId),
}

/// A push notification describing a single committed mutation.
///
/// Delivery is at-least-once and possibly reordered; the reconciler treats
/// these as hints and the debounced snapshot re-fetch remains authoritative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent<R> {
    pub action: ChangeAction<R>,
    /// Display name of whoever made the change, when the backend sends one.
    pub actor_name: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl<R> ChangeEvent<R> {
    pub fn created(record: R, actor_name: Option<String>) -> Self {
        Self {
            action: ChangeAction::Created(record),
            actor_name,
            occurred_at: Utc::now(),
        }
    }

    pub fn updated(record: R, actor_name: Option<String>) -> Self {
        Self {
            action: ChangeAction::Updated(record),
            actor_name,
            occurred_at: Utc::now(),
        }
    }

    pub fn deleted(id: RecordId, actor_name: Option<String>) -> Self {
        Self {
            action: ChangeAction::Deleted(id),
            actor_name,
            occurred_at: Utc::now(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ChangeKind {
        match self.action {
            ChangeAction::Created(_) => ChangeKind::Created,
            ChangeAction::Updated(_) => ChangeKind::Updated,
            ChangeAction::Deleted(_) => ChangeKind::Deleted,
        }
    }
}

impl<R: super::LiveRecord> ChangeEvent<R> {
    /// Id of the record the event touches.
    #[must_use]
    pub fn record_id(&self) -> RecordId {
        match &self.action {
            ChangeAction::Created(record) | ChangeAction::Updated(record) => record.id(),
            ChangeAction::Deleted(id) => *id,
        }
    }
}
