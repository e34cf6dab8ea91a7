//! Domain collections built on the persistent store.
//!
//! # Responsibility
//! - Expose note and task use-cases (add/update/toggle/remove/filter).
//! - Express each mutation as a pure transformation followed by one write.
//!
//! # Invariants
//! - Validation rejections and lookup misses never issue a write.
//! - Each collection owns exactly one slot key.

pub mod note_service;
pub mod task_service;
pub mod workspace;
