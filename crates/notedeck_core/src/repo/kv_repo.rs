//! Slot repository contracts and implementations.
//!
//! # Responsibility
//! - Persist serialized collections under string keys.
//! - Model storage quota and availability failures explicitly.
//!
//! # Invariants
//! - `set` either stores the whole value or leaves the slot untouched.
//! - Values larger than the configured per-slot quota are rejected.

use crate::db::DbError;
use crate::model::record::RecordId;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Per-slot size limit, matching common browser local storage quotas.
pub const DEFAULT_SLOT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure raised by the durable slot layer or by slot encoding.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    QuotaExceeded {
        key: String,
        size: usize,
        limit: usize,
    },
    /// Backend refused the operation (e.g. storage disabled).
    Unavailable(String),
    Encode(serde_json::Error),
    Decode(serde_json::Error),
    /// Decoded collection holds two records with the same id.
    DuplicateRecordId(RecordId),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::QuotaExceeded { key, size, limit } => write!(
                f,
                "slot `{key}` value of {size} bytes exceeds quota of {limit} bytes"
            ),
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
            Self::Encode(err) => write!(f, "failed to encode slot value: {err}"),
            Self::Decode(err) => write!(f, "failed to decode slot value: {err}"),
            Self::DuplicateRecordId(id) => write!(f, "record id `{id}` appears more than once"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) | Self::Decode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable string-keyed slot storage.
///
/// Methods take `&self` so several collection stores can share one backend.
pub trait KvRepository {
    /// Reads one slot. `Ok(None)` means the key was never written.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    /// Replaces one slot value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

/// SQLite-backed slot repository over the `kv_slots` table.
pub struct SqliteKvRepository<'conn> {
    conn: &'conn Connection,
    slot_quota_bytes: usize,
}

impl<'conn> SqliteKvRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - Returns `MissingRequiredTable`/`MissingRequiredColumn` when the
    ///   connection was not bootstrapped through [`crate::db::open_db`].
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self {
            conn,
            slot_quota_bytes: DEFAULT_SLOT_QUOTA_BYTES,
        })
    }

    /// Overrides the per-slot quota.
    pub fn with_slot_quota(mut self, bytes: usize) -> Self {
        self.slot_quota_bytes = bytes;
        self
    }

    /// Lists stored slot keys in ascending order.
    pub fn keys(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv_slots ORDER BY key ASC;")?;
        let mut rows = stmt.query([])?;
        let mut keys = Vec::new();
        while let Some(row) = rows.next()? {
            keys.push(row.get("key")?);
        }
        Ok(keys)
    }
}

impl KvRepository for SqliteKvRepository<'_> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        check_quota(key, value, self.slot_quota_bytes)?;
        self.conn.execute(
            "INSERT INTO kv_slots (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

/// In-process slot repository for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryKvRepository {
    slots: RefCell<BTreeMap<String, String>>,
    fail_writes: Cell<bool>,
    slot_quota_bytes: Option<usize>,
}

impl MemoryKvRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enforces a per-slot quota on `set`.
    pub fn with_slot_quota(mut self, bytes: usize) -> Self {
        self.slot_quota_bytes = Some(bytes);
        self
    }

    /// Makes subsequent `set` calls fail with `Unavailable` while `true`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Seeds a slot without going through `set` (bypasses failure injection).
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.slots.borrow_mut().insert(key.into(), value.into());
    }

    /// Returns the raw stored string for `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }
}

impl KvRepository for MemoryKvRepository {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.fail_writes.get() {
            return Err(StorageError::Unavailable(
                "writes disabled on memory repository".to_string(),
            ));
        }
        if let Some(limit) = self.slot_quota_bytes {
            check_quota(key, value, limit)?;
        }
        self.insert_raw(key, value);
        Ok(())
    }
}

fn check_quota(key: &str, value: &str, limit: usize) -> StorageResult<()> {
    let size = key.len() + value.len();
    if size > limit {
        return Err(StorageError::QuotaExceeded {
            key: key.to_string(),
            size,
            limit,
        });
    }
    Ok(())
}

fn ensure_connection_ready(conn: &Connection) -> StorageResult<()> {
    if !table_exists(conn, "kv_slots")? {
        return Err(StorageError::MissingRequiredTable("kv_slots"));
    }
    for column in ["key", "value", "updated_at"] {
        if !table_has_column(conn, "kv_slots", column)? {
            return Err(StorageError::MissingRequiredColumn {
                table: "kv_slots",
                column,
            });
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StorageResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StorageResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
