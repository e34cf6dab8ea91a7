//! Notes collection.
//!
//! # Responsibility
//! - Create, edit, delete and search free-form notes.
//!
//! # Invariants
//! - New notes are prepended; edits keep the note's position.
//! - A note with blank title and blank content is never stored.

use crate::model::note::Note;
use crate::model::record::{RecordId, ValidationError};
use crate::repo::kv_repo::KvRepository;
use crate::search::filter::{search_notes, SearchQuery};
use crate::store::collection::{
    ensure_unique_ids, filter_records, position_of, prepend, remove_by_id, replace_by_id,
    MutationOutcome,
};
use crate::store::persistent::{PersistentStore, WriteOutcome};
use log::{debug, info};
use std::rc::Rc;

/// Ordered note collection bound to one storage slot.
pub struct NoteCollection<'kv> {
    store: PersistentStore<'kv, Vec<Note>>,
}

impl<'kv> NoteCollection<'kv> {
    /// Loads the collection stored under `key`, or starts empty.
    pub fn open(kv: &'kv dyn KvRepository, key: impl Into<String>) -> Self {
        Self {
            store: PersistentStore::initialize_checked(kv, key, Vec::<Note>::new(), |records| {
                ensure_unique_ids(records)
            }),
        }
    }

    /// Current immutable snapshot, newest first.
    pub fn snapshot(&self) -> Rc<Vec<Note>> {
        self.store.read()
    }

    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<Note> {
        let notes = self.store.read();
        position_of(&notes, id).map(|index| notes[index].clone())
    }

    /// Creates a note at the front of the collection.
    ///
    /// # Errors
    /// - `ValidationError::EmptyNote` when both fields are blank; nothing is written.
    pub fn add(&mut self, title: &str, content: &str) -> Result<RecordId, ValidationError> {
        let note = Note::new(title, content)?;
        let id = note.id;
        let next = prepend(&self.store.read(), note);
        let outcome = self.store.write(next);
        log_mutation("add", outcome);
        Ok(id)
    }

    /// Replaces title and content of the note with `id`.
    ///
    /// # Errors
    /// - `ValidationError::EmptyNote` when both fields are blank; nothing is written.
    pub fn update(
        &mut self,
        id: RecordId,
        title: &str,
        content: &str,
    ) -> Result<MutationOutcome, ValidationError> {
        let current = self.store.read();
        match replace_by_id(&current, id, |note| note.edited(title, content))? {
            Some(next) => {
                let outcome = self.store.write(next);
                log_mutation("update", outcome);
                Ok(MutationOutcome::Applied)
            }
            None => {
                log_miss("update");
                Ok(MutationOutcome::NotFound)
            }
        }
    }

    /// Deletes the note with `id`. Repeated calls are harmless.
    pub fn remove(&mut self, id: RecordId) -> MutationOutcome {
        match remove_by_id(&self.store.read(), id) {
            Some(next) => {
                let outcome = self.store.write(next);
                log_mutation("remove", outcome);
                MutationOutcome::Applied
            }
            None => {
                log_miss("remove");
                MutationOutcome::NotFound
            }
        }
    }

    /// Notes satisfying `predicate`, in collection order.
    pub fn filter(&self, predicate: impl Fn(&Note) -> bool) -> Vec<Note> {
        filter_records(&self.store.read(), predicate)
    }

    /// Notes whose title or content contains `query` (case-insensitive).
    pub fn search(&self, query: &str) -> Vec<Note> {
        search_notes(&self.store.read(), &SearchQuery::new(query))
    }

    /// Registers a callback receiving each new snapshot.
    pub fn subscribe(&mut self, listener: impl FnMut(&Rc<Vec<Note>>) + 'kv) {
        self.store.subscribe(listener);
    }

    pub fn store(&self) -> &PersistentStore<'kv, Vec<Note>> {
        &self.store
    }
}

fn log_mutation(op: &str, outcome: WriteOutcome) {
    info!(
        "event=note_mutation module=service op={op} status=ok persisted={}",
        outcome.is_persisted()
    );
}

fn log_miss(op: &str) {
    debug!("event=note_mutation module=service op={op} status=not_found");
}
