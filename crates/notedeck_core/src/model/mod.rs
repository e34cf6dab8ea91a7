//! Domain model for note and task collections.
//!
//! # Responsibility
//! - Define the record shapes persisted in each collection slot.
//! - Own record-level validation and edit semantics.
//!
//! # Invariants
//! - Every record is identified by a stable, non-nil `RecordId`.
//! - Records are never mutated in place; edits produce new values.
//! - Deletion is a hard removal from the collection, no tombstones.

pub mod note;
pub mod record;
pub mod task;
