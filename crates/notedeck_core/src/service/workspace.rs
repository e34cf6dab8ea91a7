//! Notes and tasks opened together over one slot repository.

use crate::config::StorageKeys;
use crate::repo::kv_repo::KvRepository;
use crate::service::note_service::NoteCollection;
use crate::service::task_service::TaskCollection;

/// Both domain collections of one application session.
pub struct Workspace<'kv> {
    pub notes: NoteCollection<'kv>,
    pub tasks: TaskCollection<'kv>,
}

impl<'kv> Workspace<'kv> {
    /// Rehydrates both collections from their configured slots.
    pub fn open(kv: &'kv dyn KvRepository, keys: &StorageKeys) -> Self {
        Self {
            notes: NoteCollection::open(kv, keys.notes.as_str()),
            tasks: TaskCollection::open(kv, keys.tasks.as_str()),
        }
    }
}
