//! Implements the `KeyValueStore` trait using in-memory data.
//!
//! Note: this is compiled even in the "production" version of this crate so that library users can
//! run a session without touching the filesystem.

use crate::store::KeyValueStore;
use std::collections::HashMap;

/// An implementation of the `KeyValueStore` trait that holds everything in a `HashMap`.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct MemoryStore {
    data: HashMap<String, String>,
}

impl MemoryStore {
    /// Create a new `MemoryStore` seeded with `data`.
    pub fn new(data: HashMap<String, String>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &HashMap<String, String> {
        &self.data
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.data.get(key).cloned())
    }

    async fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        self.data.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store() {
        let mut store = MemoryStore::default();
        assert_eq!(store.get("a").await.unwrap(), None);
        store.set("a", "1").await.unwrap();
        store.set("a", "2").await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("2"));
        store.remove("a").await.unwrap();
        store.remove("a").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);
    }
}
