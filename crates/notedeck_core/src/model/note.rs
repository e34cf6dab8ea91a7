//! Note record.
//!
//! # Responsibility
//! - Define the free-form note shape stored in the notes slot.
//! - Enforce the "title or content" requirement on create and edit.
//!
//! # Invariants
//! - At least one of `title`/`content` is non-empty after trimming.
//! - Stored text is trimmed.

use crate::model::record::{
    ensure_non_nil, normalize_text, now, touch, Record, RecordId, Timestamp, ValidationError,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title shown for notes created with content only.
pub const UNTITLED_NOTE: &str = "Untitled";

/// Free-form note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: RecordId,
    pub title: String,
    pub content: String,
    pub created_at: Timestamp,
    /// Refreshed on every accepted edit.
    pub updated_at: Timestamp,
}

impl Note {
    /// Creates a note with a fresh id and `created_at == updated_at`.
    pub fn new(title: &str, content: &str) -> Result<Self, ValidationError> {
        Self::with_id(Uuid::new_v4(), title, content, now())
    }

    /// Creates a note with a caller-provided id and creation time.
    ///
    /// Used by import paths and tests where identity already exists.
    pub fn with_id(
        id: RecordId,
        title: &str,
        content: &str,
        created_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        let id = ensure_non_nil(id)?;
        let (title, content) = normalize_note_fields(title, content)?;
        Ok(Self {
            id,
            title,
            content,
            created_at,
            updated_at: created_at,
        })
    }

    /// Returns an edited copy with replaced text and refreshed `updated_at`.
    pub fn edited(&self, title: &str, content: &str) -> Result<Self, ValidationError> {
        let (title, content) = normalize_note_fields(title, content)?;
        Ok(Self {
            id: self.id,
            title,
            content,
            created_at: self.created_at,
            updated_at: touch(self.updated_at),
        })
    }

    /// Title for display, falling back to [`UNTITLED_NOTE`].
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            UNTITLED_NOTE
        } else {
            &self.title
        }
    }
}

impl Record for Note {
    fn id(&self) -> RecordId {
        self.id
    }
}

fn normalize_note_fields(title: &str, content: &str) -> Result<(String, String), ValidationError> {
    let title = normalize_text(title);
    let content = normalize_text(content);
    if title.is_empty() && content.is_empty() {
        return Err(ValidationError::EmptyNote);
    }
    Ok((title, content))
}
