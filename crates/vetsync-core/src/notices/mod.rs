//! Transient "X did Y" notices surfaced alongside the list.
//!
//! At most one notice is visible at a time; a newer notice replaces the
//! current one even if its window has not elapsed. Purely local timer
//! state, no I/O.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::models::{ChangeEvent, ChangeKind, LiveRecord};

/// How long a freshly created record's notice stays visible.
pub const CREATED_WINDOW: Duration = Duration::from_secs(3);
/// Window for update and delete notices.
pub const CHANGED_WINDOW: Duration = Duration::from_secs(2);

/// A short-lived banner describing one change event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientNotice {
    pub kind: ChangeKind,
    pub summary: String,
    pub actor_name: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl TransientNotice {
    /// Build the notice for a change event, e.g. "Dr. Reyes updated a pet tip".
    #[must_use]
    pub fn for_event<R: LiveRecord>(event: &ChangeEvent<R>) -> Self {
        let actor = event.actor_name.as_deref().unwrap_or("Someone");
        Self {
            kind: event.kind(),
            summary: format!("{actor} {} a {}", event.kind(), R::KIND.label()),
            actor_name: event.actor_name.clone(),
            timestamp: event.occurred_at,
        }
    }

    /// Display window for this notice's kind.
    #[must_use]
    pub const fn window(&self) -> Duration {
        match self.kind {
            ChangeKind::Created => CREATED_WINDOW,
            ChangeKind::Updated | ChangeKind::Deleted => CHANGED_WINDOW,
        }
    }
}

/// Single-slot notice holder with timer-driven eviction.
///
/// Callers pass `Instant`s in so the slot stays deterministic under test.
#[derive(Debug, Default)]
pub struct NoticeSlot {
    current: Option<(TransientNotice, Instant)>,
}

impl NoticeSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a notice, replacing whatever is currently visible.
    pub fn push(&mut self, notice: TransientNotice, now: Instant) {
        let expires_at = now + notice.window();
        self.current = Some((notice, expires_at));
    }

    /// The currently visible notice, evicting it first if its window has
    /// elapsed (removal does not depend on anyone having seen it).
    pub fn active(&mut self, now: Instant) -> Option<&TransientNotice> {
        if let Some((_, expires_at)) = &self.current {
            if now >= *expires_at {
                self.current = None;
            }
        }
        self.current.as_ref().map(|(notice, _)| notice)
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{PetTip, RecordId};

    fn created_notice(actor: &str) -> TransientNotice {
        TransientNotice::for_event(&ChangeEvent::created(
            PetTip::new(1, "t"),
            Some(actor.to_string()),
        ))
    }

    #[test]
    fn summary_names_actor_and_content_label() {
        let notice = created_notice("Dr. Reyes");
        assert_eq!(notice.summary, "Dr. Reyes created a pet tip");
    }

    #[test]
    fn anonymous_events_fall_back_to_someone() {
        let notice = TransientNotice::for_event::<PetTip>(&ChangeEvent::deleted(RecordId(4), None));
        assert_eq!(notice.summary, "Someone deleted a pet tip");
    }

    #[test]
    fn newest_notice_replaces_oldest() {
        let mut slot = NoticeSlot::new();
        let now = Instant::now();
        slot.push(created_notice("first"), now);
        slot.push(created_notice("second"), now);
        assert_eq!(
            slot.active(now).map(|notice| notice.summary.as_str()),
            Some("second created a pet tip")
        );
    }

    #[test]
    fn notice_expires_after_its_window() {
        let mut slot = NoticeSlot::new();
        let now = Instant::now();
        slot.push(created_notice("x"), now);

        assert!(slot.active(now + Duration::from_secs(2)).is_some());
        assert!(slot.active(now + CREATED_WINDOW).is_none());
        // Eviction is sticky once the window has elapsed.
        assert!(slot.active(now).is_none());
    }
}
