//! Display-only derivations over collection snapshots.
//!
//! # Responsibility
//! - Case-insensitive substring search for notes and tasks.
//! - Pending/completed partitioning and progress statistics for tasks.
//!
//! # Invariants
//! - Derivations are pure and never write to a collection.

pub mod filter;
