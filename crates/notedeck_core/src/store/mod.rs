//! Persistent collection store.
//!
//! # Responsibility
//! - Bind one durable slot to one in-memory value with write-through.
//! - Provide immutable snapshot helpers for ordered record collections.
//!
//! # Invariants
//! - The in-memory value and the slot only diverge after a failed write.
//! - Snapshots handed out are never mutated; every write installs a new one.

pub mod collection;
pub mod persistent;
