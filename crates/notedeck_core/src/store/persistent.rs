//! Write-through cell over one durable slot.
//!
//! # Responsibility
//! - Rehydrate the value from its slot at startup, falling back to a default.
//! - Serialize every replacement value back into the slot synchronously.
//! - Notify subscribers with the new snapshot after each write.
//!
//! # Invariants
//! - `initialize` never fails; unreadable slots degrade to `default`.
//! - `write` always updates memory, even when the durable write fails.
//! - Every observed value is the default, the loaded snapshot, or the
//!   argument of a prior `write`.

use crate::repo::kv_repo::{KvRepository, StorageError, StorageResult};
use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::rc::Rc;

/// Result of pushing a new value through to durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Value is in memory and in the durable slot.
    Persisted,
    /// Value is in memory only; it will not survive a restart.
    SessionOnly,
}

impl WriteOutcome {
    pub fn is_persisted(self) -> bool {
        matches!(self, Self::Persisted)
    }
}

/// How the initial value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Slot held a decodable value.
    Storage,
    /// Slot was absent.
    DefaultMissing,
    /// Slot was unreadable or malformed; default substituted.
    DefaultRecovered,
}

type Listener<'kv, T> = Box<dyn FnMut(&Rc<T>) + 'kv>;

/// Single mutable cell with a write-through persistence side effect.
pub struct PersistentStore<'kv, T> {
    kv: &'kv dyn KvRepository,
    key: String,
    value: Rc<T>,
    revision: u64,
    load_source: LoadSource,
    last_write: Option<WriteOutcome>,
    listeners: Vec<Listener<'kv, T>>,
}

impl<'kv, T> PersistentStore<'kv, T>
where
    T: Serialize + DeserializeOwned,
{
    /// Binds `key` on `kv` and loads its current value.
    ///
    /// Absent, unreadable or malformed slots fall back to `default_value`.
    /// Read failures are logged and never surfaced to the caller.
    pub fn initialize(kv: &'kv dyn KvRepository, key: impl Into<String>, default_value: T) -> Self {
        Self::initialize_checked(kv, key, default_value, |_| Ok(()))
    }

    /// Like [`Self::initialize`], but a decoded value rejected by `check`
    /// is treated as malformed.
    pub fn initialize_checked(
        kv: &'kv dyn KvRepository,
        key: impl Into<String>,
        default_value: T,
        check: impl FnOnce(&T) -> StorageResult<()>,
    ) -> Self {
        let key = key.into();
        let loaded = load_slot::<T>(kv, &key).and_then(|value| match value {
            Some(value) => check(&value).map(|()| Some(value)),
            None => Ok(None),
        });
        let (value, load_source) = match loaded {
            Ok(Some(value)) => {
                debug!("event=store_load module=store status=ok key={key}");
                (value, LoadSource::Storage)
            }
            Ok(None) => {
                debug!("event=store_load module=store status=missing key={key}");
                (default_value, LoadSource::DefaultMissing)
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=recovered key={key} error={}",
                    err
                );
                (default_value, LoadSource::DefaultRecovered)
            }
        };

        Self {
            kv,
            key,
            value: Rc::new(value),
            revision: 0,
            load_source,
            last_write: None,
            listeners: Vec::new(),
        }
    }

    /// Returns the current snapshot. Cheap; never fails.
    pub fn read(&self) -> Rc<T> {
        Rc::clone(&self.value)
    }

    /// Replaces the value and writes it through to the slot.
    ///
    /// A failed durable write is logged and reported as
    /// [`WriteOutcome::SessionOnly`]; the in-memory value is updated anyway.
    pub fn write(&mut self, new_value: T) -> WriteOutcome {
        let outcome = match persist_slot(self.kv, &self.key, &new_value) {
            Ok(()) => WriteOutcome::Persisted,
            Err(err) => {
                error!(
                    "event=store_write module=store status=error key={} revision={} error={}",
                    self.key,
                    self.revision + 1,
                    err
                );
                WriteOutcome::SessionOnly
            }
        };

        self.value = Rc::new(new_value);
        self.revision += 1;
        self.last_write = Some(outcome);
        for listener in &mut self.listeners {
            listener(&self.value);
        }
        outcome
    }
}

impl<'kv, T> PersistentStore<'kv, T> {
    /// Slot key this store is bound to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Number of writes since initialization.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn load_source(&self) -> LoadSource {
        self.load_source
    }

    /// Outcome of the most recent `write`; `None` before the first one.
    pub fn last_write(&self) -> Option<WriteOutcome> {
        self.last_write
    }

    /// Registers a callback invoked with each new snapshot after `write`.
    pub fn subscribe(&mut self, listener: impl FnMut(&Rc<T>) + 'kv) {
        self.listeners.push(Box::new(listener));
    }
}

/// Serializes a value into its slot representation (JSON).
pub fn encode_value<T: Serialize>(value: &T) -> StorageResult<String> {
    serde_json::to_string(value).map_err(StorageError::Encode)
}

/// Parses a slot representation back into a typed value.
///
/// Timestamp fields are revived as typed values by their serde impls.
pub fn decode_value<T: DeserializeOwned>(raw: &str) -> StorageResult<T> {
    serde_json::from_str(raw).map_err(StorageError::Decode)
}

fn load_slot<T: DeserializeOwned>(kv: &dyn KvRepository, key: &str) -> StorageResult<Option<T>> {
    match kv.get(key)? {
        Some(raw) => decode_value(&raw).map(Some),
        None => Ok(None),
    }
}

fn persist_slot<T: Serialize>(kv: &dyn KvRepository, key: &str, value: &T) -> StorageResult<()> {
    let raw = encode_value(value)?;
    kv.set(key, &raw)
}
