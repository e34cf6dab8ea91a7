//! Durable key-value storage primitive.
//!
//! # Responsibility
//! - Define the `get`/`set` slot contract the collection store writes through.
//! - Provide the SQLite implementation and an in-memory test double.
//!
//! # Invariants
//! - A slot holds one opaque UTF-8 string; callers own its encoding.
//! - Slot access never panics; failures surface as `StorageError`.

pub mod kv_repo;
