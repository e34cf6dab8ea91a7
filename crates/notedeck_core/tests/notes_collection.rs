use notedeck_core::{
    LoadSource, MemoryKvRepository, MutationOutcome, Note, NoteCollection, ValidationError,
};
use std::rc::Rc;
use uuid::Uuid;

#[test]
fn add_on_empty_store_yields_single_note() {
    let kv = MemoryKvRepository::new();
    let mut notes = NoteCollection::open(&kv, "notes");

    let id = notes.add("Milk", "").unwrap();

    let snapshot = notes.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, id);
    assert_eq!(snapshot[0].title, "Milk");
    assert_eq!(snapshot[0].content, "");
    assert_eq!(snapshot[0].created_at, snapshot[0].updated_at);
}

#[test]
fn add_prepends_with_unique_ids() {
    let kv = MemoryKvRepository::new();
    let mut notes = NoteCollection::open(&kv, "notes");

    let first = notes.add("first", "").unwrap();
    let second = notes.add("", "second body").unwrap();

    assert_ne!(first, second);
    let snapshot = notes.snapshot();
    assert_eq!(snapshot[0].id, second);
    assert_eq!(snapshot[1].id, first);
}

#[test]
fn blank_add_is_rejected_without_write() {
    let kv = MemoryKvRepository::new();
    let mut notes = NoteCollection::open(&kv, "notes");
    let before = notes.snapshot();

    let err = notes.add("", "").unwrap_err();
    assert_eq!(err, ValidationError::EmptyNote);
    assert_eq!(notes.add("   ", "\n").unwrap_err(), ValidationError::EmptyNote);

    assert!(Rc::ptr_eq(&before, &notes.snapshot()));
    assert_eq!(notes.store().revision(), 0);
    assert_eq!(kv.raw("notes"), None);
}

#[test]
fn update_preserves_position_identity_and_creation_time() {
    let kv = MemoryKvRepository::new();
    let mut notes = NoteCollection::open(&kv, "notes");
    notes.add("c", "").unwrap();
    let target = notes.add("b", "").unwrap();
    notes.add("a", "").unwrap();
    let original = notes.get(target).unwrap();

    let outcome = notes.update(target, " renamed ", " body ").unwrap();

    assert_eq!(outcome, MutationOutcome::Applied);
    let snapshot = notes.snapshot();
    assert_eq!(snapshot.len(), 3);
    assert_eq!(snapshot[1].id, target);
    assert_eq!(snapshot[1].title, "renamed");
    assert_eq!(snapshot[1].content, "body");
    assert_eq!(snapshot[1].created_at, original.created_at);
    assert!(snapshot[1].updated_at >= original.updated_at);
}

#[test]
fn blank_update_is_rejected_and_keeps_note() {
    let kv = MemoryKvRepository::new();
    let mut notes = NoteCollection::open(&kv, "notes");
    let id = notes.add("keep", "me").unwrap();
    let before = notes.snapshot();

    let err = notes.update(id, " ", "").unwrap_err();

    assert_eq!(err, ValidationError::EmptyNote);
    assert_eq!(*notes.snapshot(), *before);
    assert_eq!(notes.store().revision(), 1);
}

#[test]
fn unknown_ids_leave_collection_unchanged() {
    let kv = MemoryKvRepository::new();
    let mut notes = NoteCollection::open(&kv, "notes");
    notes.add("only", "").unwrap();
    let before = notes.snapshot().to_vec();
    let missing = Uuid::new_v4();

    assert_eq!(
        notes.update(missing, "x", "y").unwrap(),
        MutationOutcome::NotFound
    );
    assert_eq!(notes.remove(missing), MutationOutcome::NotFound);

    assert_eq!(*notes.snapshot(), before);
    assert_eq!(notes.store().revision(), 1);
}

#[test]
fn remove_is_idempotent() {
    let kv = MemoryKvRepository::new();
    let mut notes = NoteCollection::open(&kv, "notes");
    let keep = notes.add("keep", "").unwrap();
    let dropped = notes.add("drop", "").unwrap();

    assert!(notes.remove(dropped).is_applied());
    let after_once = notes.snapshot().to_vec();
    assert_eq!(notes.remove(dropped), MutationOutcome::NotFound);

    assert_eq!(*notes.snapshot(), after_once);
    assert_eq!(after_once.len(), 1);
    assert_eq!(after_once[0].id, keep);
}

#[test]
fn collection_rehydrates_from_slot() {
    let kv = MemoryKvRepository::new();
    let id = {
        let mut notes = NoteCollection::open(&kv, "notes");
        let id = notes.add("persisted", "body").unwrap();
        notes.update(id, "persisted", "edited").unwrap();
        id
    };

    let reopened = NoteCollection::open(&kv, "notes");
    let note = reopened.get(id).unwrap();
    assert_eq!(note.content, "edited");
    assert_eq!(reopened.len(), 1);
}

#[test]
fn search_and_filter_preserve_order() {
    let kv = MemoryKvRepository::new();
    let mut notes = NoteCollection::open(&kv, "notes");
    notes.add("bar", "").unwrap();
    notes.add("Foobar", "").unwrap();
    notes.add("other", "has FOO inside").unwrap();

    let hits = notes.search("foo");
    let titles: Vec<_> = hits.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["other", "Foobar"]);

    assert_eq!(notes.search("").len(), 3);
    assert_eq!(notes.filter(|n| n.content.is_empty()).len(), 2);
}

#[test]
fn subscribers_see_mutations_but_not_rejections() {
    let kv = MemoryKvRepository::new();
    let mut notes = NoteCollection::open(&kv, "notes");
    let counts = Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = Rc::clone(&counts);
    notes.subscribe(move |snapshot| sink.borrow_mut().push(snapshot.len()));

    let id = notes.add("a", "").unwrap();
    let _ = notes.add("", "");
    notes.remove(id);

    assert_eq!(*counts.borrow(), vec![1, 0]);
}

#[test]
fn slot_with_repeated_id_is_discarded_on_load() {
    let kv = MemoryKvRepository::new();
    let note = Note::new("twice", "").unwrap();
    let raw = serde_json::to_string(&vec![note.clone(), note.clone()]).unwrap();
    kv.insert_raw("notes", raw.clone());

    let mut notes = NoteCollection::open(&kv, "notes");
    assert!(notes.is_empty());
    assert_eq!(notes.store().load_source(), LoadSource::DefaultRecovered);
    assert_eq!(kv.raw("notes"), Some(raw));

    assert_eq!(notes.remove(note.id), MutationOutcome::NotFound);
    assert_eq!(notes.remove(note.id), MutationOutcome::NotFound);
}
