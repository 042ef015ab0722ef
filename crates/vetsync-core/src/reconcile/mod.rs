//! Reconciliation engine
//!
//! Merges an authoritative snapshot and an unordered, at-least-once stream
//! of change events into one de-duplicated, position-stable list. The list
//! is owned exclusively by one engine instance per mounted view; readers
//! only ever see it through [`Reconciler::records`].

use std::collections::HashMap;

use crate::models::{ChangeAction, ChangeEvent, InsertPolicy, LiveRecord, RecordId};

/// What applying an operation did to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Record was not present and got inserted.
    Inserted,
    /// Record was present and got replaced in place.
    Replaced,
    /// Record was present and got removed.
    Removed,
    /// Operation was a no-op (e.g. delete of an unknown id).
    Untouched,
}

/// In-memory reconciled list, keyed by id with a positional index so
/// updates replace in place instead of moving rows around.
#[derive(Debug, Clone)]
pub struct Reconciler<R: LiveRecord> {
    records: Vec<R>,
    index: HashMap<RecordId, usize>,
}

impl<R: LiveRecord> Default for Reconciler<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: LiveRecord> Reconciler<R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// The reconciled list, in display order.
    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: RecordId) -> bool {
        self.index.contains_key(&id)
    }

    /// Replace the entire list with an authoritative snapshot, preserving
    /// server order. Duplicate ids in the snapshot keep the first
    /// occurrence so the id-uniqueness invariant holds.
    pub fn seed(&mut self, records: Vec<R>) {
        self.records.clear();
        self.index.clear();
        for record in records {
            if self.index.contains_key(&record.id()) {
                tracing::warn!(id = %record.id(), "snapshot contains duplicate id, keeping first");
                continue;
            }
            self.index.insert(record.id(), self.records.len());
            self.records.push(record);
        }
    }

    /// Insert or replace a record.
    ///
    /// A present id is replaced in place, keeping its position, so an edit
    /// never makes a row jump. An unseen id is inserted per the content
    /// type's [`InsertPolicy`]. Idempotent under at-least-once delivery:
    /// last write by arrival wins, timestamps are not compared.
    pub fn upsert(&mut self, record: R) -> Applied {
        if let Some(&position) = self.index.get(&record.id()) {
            self.records[position] = record;
            return Applied::Replaced;
        }

        let position = match R::INSERT_POLICY {
            InsertPolicy::NewestFirst => 0,
            InsertPolicy::Chronological => self
                .records
                .partition_point(|existing| existing.created_at() <= record.created_at()),
        };
        self.records.insert(position, record);
        self.reindex(position);
        Applied::Inserted
    }

    /// Remove a record. A miss is a silent no-op; duplicate or late delete
    /// events must never error.
    pub fn remove(&mut self, id: RecordId) -> Applied {
        let Some(position) = self.index.remove(&id) else {
            return Applied::Untouched;
        };
        self.records.remove(position);
        self.reindex(position);
        Applied::Removed
    }

    /// Apply a change event, dispatching on its action.
    pub fn apply(&mut self, event: ChangeEvent<R>) -> Applied {
        match event.action {
            ChangeAction::Created(record) | ChangeAction::Updated(record) => self.upsert(record),
            ChangeAction::Deleted(id) => self.remove(id),
        }
    }

    /// Rebuild index entries at and after a structural change.
    fn reindex(&mut self, from: usize) {
        for (position, record) in self.records.iter().enumerate().skip(from) {
            self.index.insert(record.id(), position);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{ForumPost, PetTip};

    fn seeded(ids: &[i64]) -> Reconciler<PetTip> {
        let mut engine = Reconciler::new();
        engine.seed(ids.iter().map(|&id| PetTip::new(id, format!("tip {id}"))).collect());
        engine
    }

    fn ids(engine: &Reconciler<PetTip>) -> Vec<i64> {
        engine.records().iter().map(|tip| tip.id.0).collect()
    }

    #[test]
    fn seed_replaces_prior_state_exactly() {
        let mut engine = seeded(&[1, 2, 3]);
        engine.upsert(PetTip::new(9, "straggler"));

        let snapshot = vec![PetTip::new(4, "a"), PetTip::new(5, "b")];
        engine.seed(snapshot.clone());
        assert_eq!(engine.records(), snapshot.as_slice());
    }

    #[test]
    fn seed_drops_duplicate_ids_keeping_first() {
        let mut engine = Reconciler::new();
        engine.seed(vec![
            PetTip::new(1, "first"),
            PetTip::new(1, "second"),
            PetTip::new(2, "other"),
        ]);
        assert_eq!(engine.len(), 2);
        assert_eq!(engine.records()[0].title, "first");
    }

    #[test]
    fn created_event_inserts_newest_first() {
        let mut engine = seeded(&[1]);
        engine.apply(ChangeEvent::created(PetTip::new(2, "B"), None));
        assert_eq!(ids(&engine), vec![2, 1]);
    }

    #[test]
    fn duplicate_create_is_idempotent() {
        let mut engine = Reconciler::new();
        engine.seed(vec![]);
        let event = ChangeEvent::created(PetTip::new(5, "once"), None);
        engine.apply(event.clone());
        engine.apply(event);
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn update_preserves_position() {
        let mut engine = seeded(&[1, 2, 3]);
        engine.apply(ChangeEvent::updated(PetTip::new(2, "tip 2 (edited)"), None));

        assert_eq!(ids(&engine), vec![1, 2, 3]);
        assert_eq!(engine.records()[1].title, "tip 2 (edited)");
    }

    #[test]
    fn delete_of_unknown_id_is_a_no_op() {
        let mut engine = seeded(&[1]);
        let outcome = engine.apply(ChangeEvent::deleted(RecordId(99), None));
        assert_eq!(outcome, Applied::Untouched);
        assert_eq!(ids(&engine), vec![1]);
    }

    #[test]
    fn delete_then_duplicate_delete_stays_silent() {
        let mut engine = seeded(&[1, 2]);
        assert_eq!(engine.remove(RecordId(1)), Applied::Removed);
        assert_eq!(engine.remove(RecordId(1)), Applied::Untouched);
        assert_eq!(ids(&engine), vec![2]);
    }

    #[test]
    fn index_stays_consistent_after_removal() {
        let mut engine = seeded(&[1, 2, 3, 4]);
        engine.remove(RecordId(2));
        // Positions after the removal shifted; updates must still land in place.
        engine.upsert(PetTip::new(4, "tip 4 (edited)"));
        assert_eq!(ids(&engine), vec![1, 3, 4]);
        assert_eq!(engine.records()[2].title, "tip 4 (edited)");
    }

    #[test]
    fn chronological_types_insert_by_creation_time() {
        let mut early = ForumPost::new(1, "early");
        early.created_at = "2025-01-01T00:00:00Z".parse().unwrap();
        let mut late = ForumPost::new(2, "late");
        late.created_at = "2025-03-01T00:00:00Z".parse().unwrap();
        let mut middle = ForumPost::new(3, "middle");
        middle.created_at = "2025-02-01T00:00:00Z".parse().unwrap();

        let mut engine = Reconciler::new();
        engine.seed(vec![early, late]);
        engine.apply(ChangeEvent::created(middle, None));

        let order: Vec<i64> = engine.records().iter().map(|post| post.id.0).collect();
        assert_eq!(order, vec![1, 3, 2]);
    }
}
