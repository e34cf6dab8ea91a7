//! Pure transformations over ordered record collections.
//!
//! Every helper returns a new `Vec`; input slices are never modified.
//! Collections are newest-first, so inserts prepend.

use crate::model::record::{Record, RecordId};
use crate::repo::kv_repo::{StorageError, StorageResult};
use std::collections::HashSet;

/// Result of a mutation addressed by record id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    /// No record with the requested id; nothing was written.
    NotFound,
}

impl MutationOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Returns the index of the record with `id`.
pub fn position_of<R: Record>(records: &[R], id: RecordId) -> Option<usize> {
    records.iter().position(|record| record.id() == id)
}

/// Returns a new collection with `record` at the front.
pub fn prepend<R: Record + Clone>(records: &[R], record: R) -> Vec<R> {
    let mut next = Vec::with_capacity(records.len() + 1);
    next.push(record);
    next.extend_from_slice(records);
    next
}

/// Returns a new collection with the record at `id` replaced in place.
///
/// `edit` receives the current record and returns its replacement, or an
/// error that aborts the whole transformation. `Ok(None)` means `id` is absent.
pub fn replace_by_id<R, E>(
    records: &[R],
    id: RecordId,
    edit: impl FnOnce(&R) -> Result<R, E>,
) -> Result<Option<Vec<R>>, E>
where
    R: Record + Clone,
{
    let Some(index) = position_of(records, id) else {
        return Ok(None);
    };
    let replacement = edit(&records[index])?;
    let mut next = records.to_vec();
    next[index] = replacement;
    Ok(Some(next))
}

/// Returns a new collection without the record at `id`, or `None` if absent.
pub fn remove_by_id<R: Record + Clone>(records: &[R], id: RecordId) -> Option<Vec<R>> {
    let index = position_of(records, id)?;
    let mut next = records.to_vec();
    next.remove(index);
    Some(next)
}

/// Returns the records satisfying `predicate`, preserving order.
pub fn filter_records<R: Clone>(records: &[R], predicate: impl Fn(&R) -> bool) -> Vec<R> {
    records
        .iter()
        .filter(|record| predicate(record))
        .cloned()
        .collect()
}

/// Rejects collections in which any record id occurs twice.
pub fn ensure_unique_ids<R: Record>(records: &[R]) -> StorageResult<()> {
    let mut seen = HashSet::with_capacity(records.len());
    match records.iter().find(|record| !seen.insert(record.id())) {
        Some(duplicate) => Err(StorageError::DuplicateRecordId(duplicate.id())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ensure_unique_ids, filter_records, position_of, prepend, remove_by_id, replace_by_id,
    };
    use crate::repo::kv_repo::StorageError;
    use crate::model::task::Task;
    use std::convert::Infallible;
    use uuid::Uuid;

    fn tasks(titles: &[&str]) -> Vec<Task> {
        titles.iter().map(|t| Task::new(t).unwrap()).collect()
    }

    #[test]
    fn prepend_puts_newest_first() {
        let existing = tasks(&["old"]);
        let next = prepend(&existing, Task::new("new").unwrap());
        assert_eq!(next[0].title, "new");
        assert_eq!(next[1].title, "old");
        assert_eq!(existing.len(), 1);
    }

    #[test]
    fn replace_keeps_position() {
        let existing = tasks(&["a", "b", "c"]);
        let target = existing[1].id;
        let next = replace_by_id(&existing, target, |t| Ok::<_, Infallible>(t.toggled()))
            .unwrap()
            .unwrap();
        assert_eq!(position_of(&next, target), Some(1));
        assert!(next[1].completed);
        assert!(!existing[1].completed);
    }

    #[test]
    fn missing_ids_yield_none() {
        let existing = tasks(&["a"]);
        let missing = Uuid::new_v4();
        assert!(remove_by_id(&existing, missing).is_none());
        let replaced = replace_by_id(&existing, missing, |t| Ok::<_, Infallible>(t.clone()));
        assert!(replaced.unwrap().is_none());
    }

    #[test]
    fn filter_preserves_relative_order() {
        let existing = tasks(&["x1", "y", "x2"]);
        let filtered = filter_records(&existing, |t| t.title.starts_with('x'));
        let titles: Vec<_> = filtered.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["x1", "x2"]);
    }

    #[test]
    fn duplicate_ids_are_reported() {
        let unique = tasks(&["a", "b"]);
        assert!(ensure_unique_ids(&unique).is_ok());

        let mut doubled = unique.clone();
        doubled.push(unique[0].clone());
        match ensure_unique_ids(&doubled) {
            Err(StorageError::DuplicateRecordId(id)) => assert_eq!(id, unique[0].id),
            other => panic!("expected duplicate id error, got {other:?}"),
        }
    }
}
