//! Video model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::{ContentKind, InsertPolicy, LiveRecord, RecordId};

/// A video published to the customer portal.
///
/// The backend is inconsistent about the id field: admin events send `id`,
/// the portal feed sends `dbId`. Both map to [`Video::id`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[serde(alias = "dbId")]
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_status")]
    pub status: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_status() -> String {
    "Draft".to_string()
}

impl Video {
    #[must_use]
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId(id),
            title: title.into(),
            description: String::new(),
            url: None,
            category: String::new(),
            status: default_status(),
            created_at: now,
            updated_at: None,
        }
    }
}

impl LiveRecord for Video {
    const KIND: ContentKind = ContentKind::Videos;
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
        &self.title
    }

    fn search_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }

    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }

    fn status(&self) -> Option<&str> {
        Some(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_db_id_alias() {
        let video: Video = serde_json::from_str(
            r#"{"dbId": 12, "title": "Grooming basics", "createdAt": "2025-09-20T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(video.id, RecordId(12));
    }
}
