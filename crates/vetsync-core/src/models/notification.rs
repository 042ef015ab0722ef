//! User notification model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::{ContentKind, InsertPolicy, LiveRecord, RecordId};

/// A per-user notification shown in the header bell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: RecordId,
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default, alias = "isRead")]
    pub read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Notification {
    #[must_use]
    pub fn new(id: i64, message: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId(id),
            message: message.into(),
            kind: String::new(),
            read: false,
            created_at: now,
            updated_at: None,
        }
    }
}

impl LiveRecord for Notification {
    const KIND: ContentKind = ContentKind::Notifications;
    const INSERT_POLICY: InsertPolicy = InsertPolicy::NewestFirst;

    fn id(&self) -> RecordId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }

    fn headline(&self) -> &str {
        &self.message
    }

    fn category(&self) -> Option<&str> {
        Some(&self.kind)
    }
}
