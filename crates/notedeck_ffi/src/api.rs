//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose note/task intents to Dart via FRB with primitive arguments.
//! - Return plain envelopes the view re-renders from.
//! - Keep one workspace alive for the whole process.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - The workspace is loaded once and owned by a single session thread;
//!   every call runs on it in arrival order, so intents never interleave.
//! - A change that storage refused stays visible until the process exits
//!   and is reported with `persisted = false`.

use log::{info, warn};
use notedeck_core::db::open_db;
use notedeck_core::{
    core_version as core_version_inner, default_log_level, init_logging as init_logging_inner,
    ping as ping_inner, CoreConfig, MutationOutcome, Note, RecordId, SqliteKvRepository, Task,
    ValidationError, Workspace, WriteOutcome,
};
use std::sync::mpsc::{self, Receiver, SendError, Sender};
use std::sync::{Mutex, OnceLock, PoisonError};
use std::thread;
use uuid::Uuid;

const SESSION_THREAD_NAME: &str = "notedeck-session";
const SESSION_ONLY_NOTE: &str = " Not saved to storage; kept until the app closes.";

type SessionJob = Box<dyn FnOnce(&mut Workspace<'_>) + Send>;

static ENTRY_CONFIG: OnceLock<Result<CoreConfig, String>> = OnceLock::new();
static ENTRY_SESSION: Mutex<Option<Sender<SessionJob>>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive); blank
///   uses the configured level (`NOTEDECK_LOG_LEVEL` or the build default).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let level = if level.trim().is_empty() {
        entry_config()
            .map(|config| config.log_level.clone())
            .unwrap_or_else(|_| default_log_level().to_string())
    } else {
        level
    };
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Note row handed to the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub id: String,
    pub title: String,
    /// Title with the "Untitled" fallback applied.
    pub display_title: String,
    pub content: String,
    /// RFC 3339.
    pub created_at: String,
    /// RFC 3339.
    pub updated_at: String,
}

/// Task row handed to the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Search-filtered note list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesResponse {
    pub items: Vec<NoteItem>,
    /// Human-readable summary for empty states and diagnostics.
    pub message: String,
}

/// Search-filtered task lists with statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TasksResponse {
    pub pending: Vec<TaskItem>,
    pub completed: Vec<TaskItem>,
    /// Unfiltered task count.
    pub total: u32,
    pub progress_percent: u8,
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryActionResponse {
    /// Whether the collection changed.
    pub ok: bool,
    /// Whether the change reached durable storage. Always `false` when `ok` is.
    pub persisted: bool,
    /// Id of the affected record, when known.
    pub record_id: Option<String>,
    pub message: String,
}

impl EntryActionResponse {
    fn success(message: &str, record_id: RecordId, persisted: bool) -> Self {
        let message = if persisted {
            message.to_string()
        } else {
            format!("{message}{SESSION_ONLY_NOTE}")
        };
        Self {
            ok: true,
            persisted,
            record_id: Some(record_id.to_string()),
            message,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            persisted: false,
            record_id: None,
            message: message.into(),
        }
    }
}

/// Lists notes matching `query` (case-insensitive, empty matches all).
#[flutter_rust_bridge::frb(sync)]
pub fn notes_list(query: String) -> NotesResponse {
    let lookup = query.clone();
    match with_workspace(move |workspace| workspace.notes.search(&lookup)) {
        Ok(notes) => {
            let message = match (notes.is_empty(), query.is_empty()) {
                (false, _) => format!("Found {} note(s).", notes.len()),
                (true, true) => "No notes yet.".to_string(),
                (true, false) => "No notes found matching your search.".to_string(),
            };
            NotesResponse {
                items: notes.iter().map(to_note_item).collect(),
                message,
            }
        }
        Err(err) => NotesResponse {
            items: Vec::new(),
            message: format!("notes_list failed: {err}"),
        },
    }
}

/// Creates a note; blank title and content is rejected without a write.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_add(title: String, content: String) -> EntryActionResponse {
    run_action("notes_add", move |workspace| {
        let id = workspace.notes.add(&title, &content)?;
        Ok(EntryActionResponse::success(
            "Note created.",
            id,
            notes_persisted(workspace),
        ))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn notes_update(id: String, title: String, content: String) -> EntryActionResponse {
    with_record(&id, "notes_update", move |workspace, record_id| {
        let outcome = workspace.notes.update(record_id, &title, &content)?;
        Ok(describe(
            outcome,
            record_id,
            "Note updated.",
            notes_persisted(workspace),
        ))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn notes_remove(id: String) -> EntryActionResponse {
    with_record(&id, "notes_remove", |workspace, record_id| {
        let outcome = workspace.notes.remove(record_id);
        Ok(describe(
            outcome,
            record_id,
            "Note deleted.",
            notes_persisted(workspace),
        ))
    })
}

/// Lists tasks matching `query` split into pending and completed.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_list(query: String) -> TasksResponse {
    let lookup = query.clone();
    match with_workspace(move |workspace| workspace.tasks.board(&lookup)) {
        Ok(board) => {
            let shown = board.pending.len() + board.completed.len();
            let message = match (shown, query.is_empty()) {
                (0, true) => "No tasks yet.".to_string(),
                (0, false) => "No tasks found matching your search.".to_string(),
                (count, _) => format!("Found {count} task(s)."),
            };
            TasksResponse {
                pending: board.pending.iter().map(to_task_item).collect(),
                completed: board.completed.iter().map(to_task_item).collect(),
                total: u32::try_from(board.stats.total).unwrap_or(u32::MAX),
                progress_percent: board.stats.progress_percent,
                message,
            }
        }
        Err(err) => TasksResponse {
            pending: Vec::new(),
            completed: Vec::new(),
            total: 0,
            progress_percent: 0,
            message: format!("tasks_list failed: {err}"),
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn tasks_add(title: String) -> EntryActionResponse {
    run_action("tasks_add", move |workspace| {
        let id = workspace.tasks.add(&title)?;
        Ok(EntryActionResponse::success(
            "Task created.",
            id,
            tasks_persisted(workspace),
        ))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn tasks_update(id: String, title: String) -> EntryActionResponse {
    with_record(&id, "tasks_update", move |workspace, record_id| {
        let outcome = workspace.tasks.update(record_id, &title)?;
        Ok(describe(
            outcome,
            record_id,
            "Task updated.",
            tasks_persisted(workspace),
        ))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn tasks_toggle(id: String) -> EntryActionResponse {
    with_record(&id, "tasks_toggle", |workspace, record_id| {
        let outcome = workspace.tasks.toggle_completed(record_id);
        Ok(describe(
            outcome,
            record_id,
            "Task toggled.",
            tasks_persisted(workspace),
        ))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn tasks_remove(id: String) -> EntryActionResponse {
    with_record(&id, "tasks_remove", |workspace, record_id| {
        let outcome = workspace.tasks.remove(record_id);
        Ok(describe(
            outcome,
            record_id,
            "Task deleted.",
            tasks_persisted(workspace),
        ))
    })
}

fn entry_config() -> Result<&'static CoreConfig, String> {
    ENTRY_CONFIG
        .get_or_init(|| CoreConfig::resolve().map_err(|err| format!("entry config invalid: {err}")))
        .as_ref()
        .map_err(Clone::clone)
}

/// Runs `f` against the process-wide workspace and waits for its result.
fn with_workspace<T, F>(f: F) -> Result<T, String>
where
    T: Send + 'static,
    F: FnOnce(&mut Workspace<'_>) -> T + Send + 'static,
{
    let (reply_tx, reply_rx) = mpsc::channel();
    let job: SessionJob = Box::new(move |workspace: &mut Workspace<'_>| {
        let _ = reply_tx.send(f(workspace));
    });
    submit(job)?;
    reply_rx
        .recv()
        .map_err(|_| "entry session stopped before replying".to_string())
}

fn submit(mut job: SessionJob) -> Result<(), String> {
    // A poisoned lock only means an earlier caller panicked; the sender is intact.
    let mut session = ENTRY_SESSION
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if let Some(sender) = session.as_ref() {
        match sender.send(job) {
            Ok(()) => return Ok(()),
            Err(SendError(returned)) => {
                warn!("event=ffi_session module=ffi status=restart reason=worker_gone");
                job = returned;
            }
        }
    }

    let sender = start_session()?;
    sender
        .send(job)
        .map_err(|_| "entry session stopped during startup".to_string())?;
    *session = Some(sender);
    Ok(())
}

fn start_session() -> Result<Sender<SessionJob>, String> {
    let config = entry_config()?;
    let (job_tx, job_rx) = mpsc::channel::<SessionJob>();
    let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();
    thread::Builder::new()
        .name(SESSION_THREAD_NAME.to_string())
        .spawn(move || run_session(config, job_rx, ready_tx))
        .map_err(|err| format!("entry session spawn failed: {err}"))?;
    ready_rx
        .recv()
        .map_err(|_| "entry session exited during startup".to_string())??;
    Ok(job_tx)
}

fn run_session(
    config: &CoreConfig,
    jobs: Receiver<SessionJob>,
    ready: Sender<Result<(), String>>,
) {
    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            let _ = ready.send(Err(format!("entry DB open failed: {err}")));
            return;
        }
    };
    let kv = match SqliteKvRepository::try_new(&conn) {
        Ok(kv) => kv,
        Err(err) => {
            let _ = ready.send(Err(format!("entry storage init failed: {err}")));
            return;
        }
    };
    let mut workspace = Workspace::open(&kv, &config.keys);
    info!(
        "event=ffi_session module=ffi status=ok db_path={}",
        config.db_path.display()
    );
    let _ = ready.send(Ok(()));

    for job in jobs {
        job(&mut workspace);
    }
}

fn run_action<F>(op: &'static str, f: F) -> EntryActionResponse
where
    F: FnOnce(&mut Workspace<'_>) -> Result<EntryActionResponse, ValidationError>
        + Send
        + 'static,
{
    match with_workspace(f) {
        Ok(Ok(response)) => response,
        Ok(Err(rejection)) => EntryActionResponse::failure(format!("Rejected: {rejection}.")),
        Err(err) => EntryActionResponse::failure(format!("{op} failed: {err}")),
    }
}

fn with_record<F>(id: &str, op: &'static str, f: F) -> EntryActionResponse
where
    F: FnOnce(&mut Workspace<'_>, RecordId) -> Result<EntryActionResponse, ValidationError>
        + Send
        + 'static,
{
    let Ok(record_id) = Uuid::parse_str(id.trim()) else {
        warn!("event=ffi_call module=ffi op={op} status=invalid_id");
        return EntryActionResponse::failure(format!("{op} failed: invalid id `{id}`"));
    };
    run_action(op, move |workspace| f(workspace, record_id))
}

fn describe(
    outcome: MutationOutcome,
    id: RecordId,
    applied: &str,
    persisted: bool,
) -> EntryActionResponse {
    match outcome {
        MutationOutcome::Applied => EntryActionResponse::success(applied, id, persisted),
        MutationOutcome::NotFound => EntryActionResponse {
            ok: false,
            persisted: false,
            record_id: Some(id.to_string()),
            message: "Record not found; nothing changed.".to_string(),
        },
    }
}

fn notes_persisted(workspace: &Workspace<'_>) -> bool {
    workspace
        .notes
        .store()
        .last_write()
        .is_some_and(WriteOutcome::is_persisted)
}

fn tasks_persisted(workspace: &Workspace<'_>) -> bool {
    workspace
        .tasks
        .store()
        .last_write()
        .is_some_and(WriteOutcome::is_persisted)
}

fn to_note_item(note: &Note) -> NoteItem {
    NoteItem {
        id: note.id.to_string(),
        title: note.title.clone(),
        display_title: note.display_title().to_string(),
        content: note.content.clone(),
        created_at: note.created_at.to_rfc3339(),
        updated_at: note.updated_at.to_rfc3339(),
    }
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id.to_string(),
        title: task.title.clone(),
        completed: task.completed,
        created_at: task.created_at.to_rfc3339(),
        updated_at: task.updated_at.to_rfc3339(),
    }
}
