//! Lost/found forum post model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::{ContentKind, InsertPolicy, LiveRecord, RecordId};

/// A post on the lost/found forum.
///
/// The forum reads oldest-first, so unseen pushed posts are inserted by
/// creation time rather than at the front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumPost {
    pub id: RecordId,
    pub title: String,
    #[serde(default, alias = "content")]
    pub body: String,
    #[serde(default)]
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ForumPost {
    #[must_use]
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId(id),
            title: title.into(),
            body: String::new(),
            author_name: String::new(),
            created_at: now,
            updated_at: None,
        }
    }
}

impl LiveRecord for ForumPost {
    const KIND: ContentKind = ContentKind::ForumPosts;
    const INSERT_POLICY: InsertPolicy = InsertPolicy::Chronological;

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
        &self.title
    }

    fn search_text(&self) -> String {
        format!("{} {} {}", self.title, self.body, self.author_name)
    }
}
