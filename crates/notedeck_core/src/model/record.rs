//! Shared record identity, timestamps and validation errors.
//!
//! # Responsibility
//! - Provide the `Record` contract used by generic collection helpers.
//! - Centralize timestamp stamping so `updated_at` never moves backwards.
//!
//! # Invariants
//! - `id` and `created_at` are immutable for the record lifetime.
//! - `updated_at >= created_at` for every record produced by this crate.

use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a note or task.
pub type RecordId = Uuid;

/// Wall-clock timestamp; serialized as an RFC 3339 string.
pub type Timestamp = DateTime<Utc>;

/// Identity contract shared by all collection records.
pub trait Record {
    fn id(&self) -> RecordId;
}

/// Rejection raised when input would produce a blank or unidentifiable record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Both title and content are blank after trimming.
    EmptyNote,
    /// Task title is blank after trimming.
    EmptyTaskTitle,
    /// Caller supplied the nil UUID as record id.
    NilId,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyNote => write!(f, "note requires a non-blank title or content"),
            Self::EmptyTaskTitle => write!(f, "task requires a non-blank title"),
            Self::NilId => write!(f, "record id must not be nil"),
        }
    }
}

impl Error for ValidationError {}

/// Returns the current wall-clock time.
pub fn now() -> Timestamp {
    Utc::now()
}

/// Returns a refreshed `updated_at` that is never earlier than `previous`.
pub fn touch(previous: Timestamp) -> Timestamp {
    now().max(previous)
}

pub(crate) fn ensure_non_nil(id: RecordId) -> Result<RecordId, ValidationError> {
    if id.is_nil() {
        return Err(ValidationError::NilId);
    }
    Ok(id)
}

pub(crate) fn normalize_text(value: &str) -> String {
    value.trim().to_string()
}
