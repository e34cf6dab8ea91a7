use notedeck_core::{
    LoadSource, MemoryKvRepository, MutationOutcome, Task, TaskCollection, ValidationError,
};
use uuid::Uuid;

#[test]
fn add_creates_pending_task_at_front() {
    let kv = MemoryKvRepository::new();
    let mut tasks = TaskCollection::open(&kv, "tasks");
    tasks.add("older").unwrap();

    let id = tasks.add("  X  ").unwrap();

    let snapshot = tasks.snapshot();
    assert_eq!(snapshot[0].id, id);
    assert_eq!(snapshot[0].title, "X");
    assert!(!snapshot[0].completed);
    assert_eq!(snapshot[0].created_at, snapshot[0].updated_at);
}

#[test]
fn blank_title_is_rejected() {
    let kv = MemoryKvRepository::new();
    let mut tasks = TaskCollection::open(&kv, "tasks");

    assert_eq!(tasks.add("   ").unwrap_err(), ValidationError::EmptyTaskTitle);
    assert!(tasks.is_empty());
    assert_eq!(kv.raw("tasks"), None);
}

#[test]
fn toggle_flips_completion_back_and_forth() {
    let kv = MemoryKvRepository::new();
    let mut tasks = TaskCollection::open(&kv, "tasks");
    let id = tasks.add("X").unwrap();
    let created = tasks.get(id).unwrap();

    assert_eq!(tasks.toggle_completed(id), MutationOutcome::Applied);
    let done = tasks.get(id).unwrap();
    assert!(done.completed);
    assert!(done.updated_at >= created.updated_at);
    assert_eq!(done.created_at, created.created_at);

    tasks.toggle_completed(id);
    assert!(!tasks.get(id).unwrap().completed);
}

#[test]
fn update_renames_and_keeps_completion() {
    let kv = MemoryKvRepository::new();
    let mut tasks = TaskCollection::open(&kv, "tasks");
    let id = tasks.add("draft").unwrap();
    tasks.add("newer").unwrap();
    tasks.toggle_completed(id);

    assert!(tasks.update(id, "final").unwrap().is_applied());

    let snapshot = tasks.snapshot();
    assert_eq!(snapshot[1].id, id);
    assert_eq!(snapshot[1].title, "final");
    assert!(snapshot[1].completed);
    assert_eq!(
        tasks.update(id, "").unwrap_err(),
        ValidationError::EmptyTaskTitle
    );
}

#[test]
fn unknown_ids_are_no_ops() {
    let kv = MemoryKvRepository::new();
    let mut tasks = TaskCollection::open(&kv, "tasks");
    tasks.add("only").unwrap();
    let before = tasks.snapshot().to_vec();
    let missing = Uuid::new_v4();

    assert_eq!(tasks.update(missing, "x").unwrap(), MutationOutcome::NotFound);
    assert_eq!(tasks.toggle_completed(missing), MutationOutcome::NotFound);
    assert_eq!(tasks.remove(missing), MutationOutcome::NotFound);

    assert_eq!(*tasks.snapshot(), before);
    assert_eq!(tasks.store().revision(), 1);
}

#[test]
fn remove_twice_equals_remove_once() {
    let kv = MemoryKvRepository::new();
    let mut tasks = TaskCollection::open(&kv, "tasks");
    let id = tasks.add("gone").unwrap();

    tasks.remove(id);
    let once = tasks.snapshot().to_vec();
    tasks.remove(id);

    assert_eq!(*tasks.snapshot(), once);
    assert!(once.is_empty());
}

#[test]
fn board_reports_progress_over_all_tasks() {
    let kv = MemoryKvRepository::new();
    let mut tasks = TaskCollection::open(&kv, "tasks");
    let done = tasks.add("one").unwrap();
    tasks.add("two").unwrap();
    tasks.add("three").unwrap();
    tasks.add("four").unwrap();
    tasks.toggle_completed(done);

    let board = tasks.board("");
    assert_eq!(board.stats.total, 4);
    assert_eq!(board.stats.completed, 1);
    assert_eq!(board.stats.pending, 3);
    assert_eq!(board.stats.progress_percent, 25);
}

#[test]
fn notes_and_tasks_keep_separate_slots() {
    let kv = MemoryKvRepository::new();
    let mut tasks = TaskCollection::open(&kv, "tasks");
    tasks.add("task").unwrap();

    let notes = notedeck_core::NoteCollection::open(&kv, "notes");
    assert!(notes.is_empty());
    assert!(kv.raw("tasks").is_some());
    assert_eq!(kv.raw("notes"), None);
}

#[test]
fn slot_with_repeated_id_is_discarded_on_load() {
    let kv = MemoryKvRepository::new();
    let task = Task::new("twice").unwrap();
    let other = Task::new("once").unwrap();
    let raw = serde_json::to_string(&vec![task.clone(), other, task.toggled()]).unwrap();
    kv.insert_raw("tasks", raw);

    let mut tasks = TaskCollection::open(&kv, "tasks");
    assert!(tasks.is_empty());
    assert_eq!(tasks.store().load_source(), LoadSource::DefaultRecovered);

    tasks.add("fresh").unwrap();
    let reopened = TaskCollection::open(&kv, "tasks");
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.store().load_source(), LoadSource::Storage);
}
