//! Task (checklist item) record.
//!
//! # Invariants
//! - `title` is non-empty after trimming.
//! - New tasks start with `completed = false`.

use crate::model::record::{
    ensure_non_nil, normalize_text, now, touch, Record, RecordId, Timestamp, ValidationError,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Checklist item with a completion flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Task {
    /// Creates a pending task with a fresh id.
    pub fn new(title: &str) -> Result<Self, ValidationError> {
        Self::with_id(Uuid::new_v4(), title, now())
    }

    /// Creates a pending task with a caller-provided id and creation time.
    pub fn with_id(
        id: RecordId,
        title: &str,
        created_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        let id = ensure_non_nil(id)?;
        Ok(Self {
            id,
            title: normalize_task_title(title)?,
            completed: false,
            created_at,
            updated_at: created_at,
        })
    }

    /// Returns a renamed copy; completion state is preserved.
    pub fn edited(&self, title: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            title: normalize_task_title(title)?,
            updated_at: touch(self.updated_at),
            ..self.clone()
        })
    }

    /// Returns a copy with `completed` flipped.
    pub fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            updated_at: touch(self.updated_at),
            ..self.clone()
        }
    }

    pub fn is_pending(&self) -> bool {
        !self.completed
    }
}

impl Record for Task {
    fn id(&self) -> RecordId {
        self.id
    }
}

fn normalize_task_title(title: &str) -> Result<String, ValidationError> {
    let title = normalize_text(title);
    if title.is_empty() {
        return Err(ValidationError::EmptyTaskTitle);
    }
    Ok(title)
}

#[cfg(test)]
mod tests {
    use super::Task;
    use crate::model::record::ValidationError;

    #[test]
    fn toggled_flips_without_touching_title() {
        let task = Task::new("ship it").unwrap();
        let done = task.toggled();
        assert!(done.completed);
        assert_eq!(done.title, "ship it");
        assert!(done.toggled().is_pending());
    }

    #[test]
    fn edited_rejects_blank_title() {
        let task = Task::new("x").unwrap();
        assert_eq!(task.edited("  ").unwrap_err(), ValidationError::EmptyTaskTitle);
    }
}
