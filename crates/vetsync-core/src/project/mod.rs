//! View projection: the filtered/searched subset shown to the user.
//!
//! Pure functions over `(records, filters)`; nothing here caches, so the
//! projection can never desync from either input.

use serde::{Deserialize, Serialize};

use crate::models::LiveRecord;

/// Exact-equality filter over a designated field, with an "All" sentinel
/// that matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldFilter {
    #[default]
    All,
    Only(String),
}

impl FieldFilter {
    /// Parse a user-supplied value; "All" (any case) or empty means no filter.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::All,
            Some(value) if value.eq_ignore_ascii_case("all") => Self::All,
            Some(value) => Self::Only(value.to_string()),
        }
    }

    #[must_use]
    pub fn matches(&self, field: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => field == Some(wanted.as_str()),
        }
    }
}

/// User-controlled search and filter state. Lives with the host view and
/// survives snapshot refreshes; independent of the reconciled list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub category: FieldFilter,
    #[serde(default)]
    pub status: FieldFilter,
}

impl FilterState {
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.search.trim().is_empty()
            && self.category == FieldFilter::All
            && self.status == FieldFilter::All
    }
}

/// Derive the visible subset of the reconciled list.
#[must_use]
pub fn project<R: LiveRecord>(records: &[R], filters: &FilterState) -> Vec<R> {
    let query = filters.search.trim().to_lowercase();
    records
        .iter()
        .filter(|record| matches_search(*record, &query))
        .filter(|record| filters.category.matches(record.category()))
        .filter(|record| filters.status.matches(record.status()))
        .cloned()
        .collect()
}

fn matches_search<R: LiveRecord>(record: &R, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    record.search_text().to_lowercase().contains(query)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::PetTip;

    fn tip(id: i64, title: &str, category: &str, status: &str) -> PetTip {
        let mut tip = PetTip::new(id, title);
        tip.category = category.to_string();
        tip.status = status.to_string();
        tip
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let records = vec![
            tip(1, "Vaccination tips", "Health", "Published"),
            tip(2, "Diet advice", "Nutrition", "Published"),
        ];
        let filters = FilterState {
            search: "vacc".to_string(),
            ..Default::default()
        };

        let visible = project(&records, &filters);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id.0, 1);
    }

    #[test]
    fn all_sentinel_matches_every_status() {
        let records = vec![
            tip(1, "a", "Health", "Published"),
            tip(2, "b", "Health", "Draft"),
        ];
        let filters = FilterState {
            status: FieldFilter::parse(Some("All")),
            ..Default::default()
        };
        assert_eq!(project(&records, &filters), records);
    }

    #[test]
    fn category_filter_is_exact_equality() {
        let records = vec![
            tip(1, "a", "Health", "Published"),
            tip(2, "b", "Nutrition", "Published"),
        ];
        let filters = FilterState {
            category: FieldFilter::Only("Health".to_string()),
            ..Default::default()
        };

        let visible = project(&records, &filters);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].category, "Health");
    }

    #[test]
    fn projection_is_pure_and_repeatable() {
        let records = vec![tip(1, "Vaccination tips", "Health", "Published")];
        let filters = FilterState {
            search: "tips".to_string(),
            ..Default::default()
        };

        let first = project(&records, &filters);
        let second = project(&records, &filters);
        assert_eq!(first, second);
        // Changing only the search never mutates the input list.
        assert_eq!(records[0].title, "Vaccination tips");
    }

    #[test]
    fn combined_filters_compose() {
        let records = vec![
            tip(1, "Vaccination tips", "Health", "Published"),
            tip(2, "Vaccination draft", "Health", "Draft"),
            tip(3, "Diet advice", "Nutrition", "Published"),
        ];
        let filters = FilterState {
            search: "vacc".to_string(),
            category: FieldFilter::Only("Health".to_string()),
            status: FieldFilter::Only("Published".to_string()),
        };

        let visible = project(&records, &filters);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id.0, 1);
    }

    #[test]
    fn parse_treats_all_and_empty_as_sentinel() {
        assert_eq!(FieldFilter::parse(None), FieldFilter::All);
        assert_eq!(FieldFilter::parse(Some("  ")), FieldFilter::All);
        assert_eq!(FieldFilter::parse(Some("ALL")), FieldFilter::All);
        assert_eq!(
            FieldFilter::parse(Some("Health")),
            FieldFilter::Only("Health".to_string())
        );
    }
}
