//! Core domain logic for notedeck.
//! Notes and tasks live in memory and are written through to durable slots.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod store;

pub use config::{ConfigError, CoreConfig, StorageKeys};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::Note;
pub use model::record::{Record, RecordId, Timestamp, ValidationError};
pub use model::task::Task;
pub use repo::kv_repo::{
    KvRepository, MemoryKvRepository, SqliteKvRepository, StorageError, StorageResult,
};
pub use search::filter::{
    partition_tasks, progress_percent, search_notes, search_tasks, task_board, SearchQuery,
    TaskBoard, TaskPartition, TaskStats,
};
pub use service::note_service::NoteCollection;
pub use service::task_service::TaskCollection;
pub use service::workspace::Workspace;
pub use store::collection::MutationOutcome;
pub use store::persistent::{LoadSource, PersistentStore, WriteOutcome};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
