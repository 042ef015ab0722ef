//! Record identity and the content-type seam used by the reconciler.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Server-assigned numeric identifier, unique within a content type.
///
/// Ids are never generated client-side; every record arriving over the
/// snapshot or push channel already carries one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| Error::InvalidInput(format!("Invalid record id: {s}")))
    }
}

/// Where an unseen record lands when an upsert inserts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPolicy {
    /// Insert at the front of the list (newest-first lists).
    NewestFirst,
    /// Insert by ascending creation time (server-defined chronological lists).
    Chronological,
}

/// The content types the backend serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Tips,
    Videos,
    ForumPosts,
    Notifications,
}

impl ContentKind {
    pub const ALL: [Self; 4] = [
        Self::Tips,
        Self::Videos,
        Self::ForumPosts,
        Self::Notifications,
    ];

    /// REST path segment under `/content` (notifications live at the root).
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Tips => "content/tips",
            Self::Videos => "content/videos",
            Self::ForumPosts => "content/forum-posts",
            Self::Notifications => "notifications",
        }
    }

    /// Key under which the backend may wrap the snapshot list.
    #[must_use]
    pub const fn collection_key(self) -> &'static str {
        match self {
            Self::Tips => "tips",
            Self::Videos => "videos",
            Self::ForumPosts => "posts",
            Self::Notifications => "notifications",
        }
    }

    /// Name of the room-join message emitted once the transport connects.
    ///
    /// Admin-scoped content joins the shared admin room; notifications are
    /// scoped per user.
    #[must_use]
    pub const fn join_event(self) -> &'static str {
        match self {
            Self::Tips | Self::Videos | Self::ForumPosts => "join_admin_room",
            Self::Notifications => "join",
        }
    }

    /// Human-readable singular label ("Dr. Reyes updated a pet tip").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tips => "pet tip",
            Self::Videos => "video",
            Self::ForumPosts => "forum post",
            Self::Notifications => "notification",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tips => "tips",
            Self::Videos => "videos",
            Self::ForumPosts => "forum-posts",
            Self::Notifications => "notifications",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tips" | "tip" => Ok(Self::Tips),
            "videos" | "video" => Ok(Self::Videos),
            "forum-posts" | "forum" | "posts" => Ok(Self::ForumPosts),
            "notifications" | "notification" => Ok(Self::Notifications),
            other => Err(Error::UnknownContentKind(other.to_string())),
        }
    }
}

/// The seam between concrete content types and the generic reconciler,
/// projection, and live-list machinery.
pub trait LiveRecord: Clone + Send + Sync + 'static {
    /// Content type this record belongs to.
    const KIND: ContentKind;

    /// Where unseen records land on upsert.
    const INSERT_POLICY: InsertPolicy;

    fn id(&self) -> RecordId;

    fn created_at(&self) -> DateTime<Utc>;

    /// Last-update timestamp, falling back to creation time when the
    /// backend omits it.
    fn updated_at(&self) -> DateTime<Utc> {
        self.created_at()
    }

    /// Primary display line for the record.
    fn headline(&self) -> &str;

    /// Concatenated searchable text (matched case-insensitively).
    fn search_text(&self) -> String {
        self.headline().to_string()
    }

    /// Category field, when the type has one.
    fn category(&self) -> Option<&str> {
        None
    }

    /// Status field, when the type has one.
    fn status(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_parses_trimmed_integers() {
        assert_eq!("42".parse::<RecordId>().unwrap(), RecordId(42));
        assert_eq!(" 7 ".parse::<RecordId>().unwrap(), RecordId(7));
        assert!("abc".parse::<RecordId>().is_err());
    }

    #[test]
    fn content_kind_parses_aliases() {
        assert_eq!("tips".parse::<ContentKind>().unwrap(), ContentKind::Tips);
        assert_eq!(
            "forum".parse::<ContentKind>().unwrap(),
            ContentKind::ForumPosts
        );
        assert_eq!(
            "Notifications".parse::<ContentKind>().unwrap(),
            ContentKind::Notifications
        );
        assert!("appointments".parse::<ContentKind>().is_err());
    }

    #[test]
    fn admin_content_joins_admin_room() {
        assert_eq!(ContentKind::Tips.join_event(), "join_admin_room");
        assert_eq!(ContentKind::Videos.join_event(), "join_admin_room");
        assert_eq!(ContentKind::Notifications.join_event(), "join");
    }
}
