use chrono::{DateTime, TimeZone, Utc};
use notedeck_core::store::persistent::{decode_value, encode_value};
use notedeck_core::{Note, Task, ValidationError};
use uuid::Uuid;

fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 13, 10, 0, 0).unwrap()
}

#[test]
fn note_new_sets_identity_and_equal_timestamps() {
    let note = Note::new("  Milk ", "").unwrap();

    assert!(!note.id.is_nil());
    assert_eq!(note.title, "Milk");
    assert_eq!(note.content, "");
    assert_eq!(note.created_at, note.updated_at);
}

#[test]
fn note_requires_title_or_content() {
    assert_eq!(Note::new(" ", "\n\t").unwrap_err(), ValidationError::EmptyNote);
    assert!(Note::new("", "body").is_ok());
}

#[test]
fn with_id_rejects_nil_uuid() {
    let err = Note::with_id(Uuid::nil(), "t", "c", fixed_time()).unwrap_err();
    assert_eq!(err, ValidationError::NilId);
    let err = Task::with_id(Uuid::nil(), "t", fixed_time()).unwrap_err();
    assert_eq!(err, ValidationError::NilId);
}

#[test]
fn note_serialization_uses_camel_case_wire_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let note = Note::with_id(id, "Title", "Body", fixed_time()).unwrap();

    let json = serde_json::to_value(&note).unwrap();
    assert_eq!(json["id"], id.to_string());
    assert_eq!(json["title"], "Title");
    assert_eq!(json["content"], "Body");
    let created = json["createdAt"].as_str().unwrap();
    assert_eq!(
        DateTime::parse_from_rfc3339(created).unwrap(),
        fixed_time()
    );
    assert!(json.get("updatedAt").is_some());
    assert!(json.get("created_at").is_none());
}

#[test]
fn task_serialization_round_trips_with_timestamps() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-666666666666").unwrap();
    let task = Task::with_id(id, "ship", fixed_time()).unwrap().toggled();

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["completed"], true);

    let decoded: Task = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, task);
}

#[test]
fn collection_round_trip_preserves_order_and_sub_second_times() {
    let notes = vec![
        Note::new("first", "").unwrap(),
        Note::new("", "second body").unwrap(),
        Note::new("third", "x").unwrap(),
    ];

    let raw = encode_value(&notes).unwrap();
    let decoded: Vec<Note> = decode_value(&raw).unwrap();

    assert_eq!(decoded, notes);
}

#[test]
fn decodes_millisecond_iso_timestamps() {
    let raw = r#"[{
        "id": "11111111-2222-4333-8444-777777777777",
        "title": "Milk",
        "content": "",
        "createdAt": "2024-01-01T00:00:00.000Z",
        "updatedAt": "2024-01-02T08:30:00.250Z"
    }]"#;

    let notes: Vec<Note> = decode_value(raw).unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(
        notes[0].created_at,
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    );
    assert!(notes[0].updated_at > notes[0].created_at);
}

#[test]
fn task_completed_defaults_to_false_when_missing() {
    let raw = r#"{
        "id": "11111111-2222-4333-8444-888888888888",
        "title": "legacy",
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z"
    }"#;
    let task: Task = serde_json::from_str(raw).unwrap();
    assert!(!task.completed);
}
