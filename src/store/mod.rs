//! The persistent key-value service and the record store built on top of it.
//!
//! `KeyValueStore` is the storage seam: a flat map of string keys to string values. `FileStore`
//! keeps that map in a JSON file, `MemoryStore` keeps it in memory. `RecordStore` knows which keys
//! hold what and how the values are encoded.

mod file;
mod memory;
mod records;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use records::{RecordStore, UserKeys, LOGGED_IN_USER};

/// A string-keyed store of string values.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if there is none.
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&mut self, key: &str) -> anyhow::Result<()>;
}
