//! Pet-care tip model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::{ContentKind, InsertPolicy, LiveRecord, RecordId};

/// A pet-care tip authored in the admin back-office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetTip {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub short_description: String,
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

impl PetTip {
    /// Create a tip with the given id and title; remaining fields default.
    #[must_use]
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId(id),
            title: title.into(),
            short_description: String::new(),
            category: String::new(),
            status: default_status(),
            created_at: now,
            updated_at: None,
        }
    }
}

impl LiveRecord for PetTip {
    const KIND: ContentKind = ContentKind::Tips;
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
        format!("{} {}", self.title, self.short_description)
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
    fn deserializes_backend_shape() {
        let tip: PetTip = serde_json::from_str(
            r#"{
                "id": 3,
                "title": "Vaccination schedule",
                "shortDescription": "Core vaccines by age",
                "category": "Health",
                "status": "Published",
                "createdAt": "2025-10-01T08:30:00Z",
                "updatedAt": "2025-10-02T09:00:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(tip.id, RecordId(3));
        assert_eq!(tip.category, "Health");
        assert!(tip.updated_at.is_some());
    }

    #[test]
    fn missing_status_defaults_to_draft() {
        let tip: PetTip = serde_json::from_str(
            r#"{"id": 1, "title": "T", "createdAt": "2025-10-01T08:30:00Z"}"#,
        )
        .unwrap();
        assert_eq!(tip.status, "Draft");
        assert_eq!(LiveRecord::updated_at(&tip), tip.created_at);
    }
}
