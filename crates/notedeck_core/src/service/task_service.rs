//! Tasks collection.
//!
//! # Invariants
//! - New tasks are prepended and start pending.
//! - A task with a blank title is never stored.

use crate::model::record::{RecordId, ValidationError};
use crate::model::task::Task;
use crate::repo::kv_repo::KvRepository;
use crate::search::filter::{search_tasks, task_board, SearchQuery, TaskBoard};
use crate::store::collection::{
    ensure_unique_ids, filter_records, position_of, prepend, remove_by_id, replace_by_id,
    MutationOutcome,
};
use crate::store::persistent::{PersistentStore, WriteOutcome};
use log::{debug, info};
use std::convert::Infallible;
use std::rc::Rc;

/// Ordered task collection bound to one storage slot.
pub struct TaskCollection<'kv> {
    store: PersistentStore<'kv, Vec<Task>>,
}

impl<'kv> TaskCollection<'kv> {
    pub fn open(kv: &'kv dyn KvRepository, key: impl Into<String>) -> Self {
        Self {
            store: PersistentStore::initialize_checked(kv, key, Vec::<Task>::new(), |records| {
                ensure_unique_ids(records)
            }),
        }
    }

    pub fn snapshot(&self) -> Rc<Vec<Task>> {
        self.store.read()
    }

    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<Task> {
        let tasks = self.store.read();
        position_of(&tasks, id).map(|index| tasks[index].clone())
    }

    /// Creates a pending task at the front of the collection.
    pub fn add(&mut self, title: &str) -> Result<RecordId, ValidationError> {
        let task = Task::new(title)?;
        let id = task.id;
        let next = prepend(&self.store.read(), task);
        log_mutation("add", self.store.write(next));
        Ok(id)
    }

    /// Renames the task with `id`; completion state is kept.
    pub fn update(&mut self, id: RecordId, title: &str) -> Result<MutationOutcome, ValidationError> {
        let current = self.store.read();
        let next = replace_by_id(&current, id, |task| task.edited(title))?;
        Ok(self.apply("update", next))
    }

    /// Flips completion of the task with `id`.
    pub fn toggle_completed(&mut self, id: RecordId) -> MutationOutcome {
        let current = self.store.read();
        let next = match replace_by_id(&current, id, |task| Ok::<_, Infallible>(task.toggled())) {
            Ok(next) => next,
            Err(never) => match never {},
        };
        self.apply("toggle", next)
    }

    /// Deletes the task with `id`. Repeated calls are harmless.
    pub fn remove(&mut self, id: RecordId) -> MutationOutcome {
        let next = remove_by_id(&self.store.read(), id);
        self.apply("remove", next)
    }

    pub fn filter(&self, predicate: impl Fn(&Task) -> bool) -> Vec<Task> {
        filter_records(&self.store.read(), predicate)
    }

    /// Tasks whose title contains `query` (case-insensitive).
    pub fn search(&self, query: &str) -> Vec<Task> {
        search_tasks(&self.store.read(), &SearchQuery::new(query))
    }

    /// Pending/completed lists for `query` with collection statistics.
    pub fn board(&self, query: &str) -> TaskBoard {
        task_board(&self.store.read(), &SearchQuery::new(query))
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Rc<Vec<Task>>) + 'kv) {
        self.store.subscribe(listener);
    }

    pub fn store(&self) -> &PersistentStore<'kv, Vec<Task>> {
        &self.store
    }

    fn apply(&mut self, op: &str, next: Option<Vec<Task>>) -> MutationOutcome {
        let Some(next) = next else {
            debug!("event=task_mutation module=service op={op} status=not_found");
            return MutationOutcome::NotFound;
        };
        log_mutation(op, self.store.write(next));
        MutationOutcome::Applied
    }
}

fn log_mutation(op: &str, outcome: WriteOutcome) {
    info!(
        "event=task_mutation module=service op={op} status=ok persisted={}",
        outcome.is_persisted()
    );
}
