//! Persistent key-value namespaces.
//!
//! A [`KeyValueStore`] plays the part of the browser's local storage: a flat
//! string-to-string namespace shared by everything the client persists. Only
//! [`crate::SessionStore`] writes the session entry; other application state
//! may live next to it and is wiped together with it on logout.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::fmt::Debug;

/// A flat, string-keyed persistent namespace.
///
/// Calls are synchronous. Implementations need no cross-call locking beyond
/// what keeps a single call consistent.
pub trait KeyValueStore: Send + Sync + Debug {
    /// Read the value under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, overwriting any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Remove every key in the namespace.
    fn clear(&self) -> Result<(), StoreError>;
}

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but is not a JSON object of strings.
    #[error("Store file is corrupted: {0}")]
    Corrupted(#[from] serde_json::Error),

    /// A writer panicked while holding the store's lock.
    #[error("Store lock poisoned")]
    Poisoned,
}
