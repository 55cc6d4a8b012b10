//! Implements the `KeyValueStore` trait on top of a single JSON file.

use crate::error::Res;
use crate::store::KeyValueStore;
use crate::utils;
use anyhow::Context;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Keeps every key and value in one JSON object on disk, e.g.
///
/// ```json
/// {
///   "loggedInUser": "{\"username\":\"asha\"}",
///   "expenses_asha": "[{\"id\":1700000000000,\"name\":\"Lunch\", ...}]"
/// }
/// ```
///
/// Every `set` rewrites the whole file through a temporary file and a rename, so the file on disk
/// is always either the old or the new version.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole map. A missing or empty file is an empty map.
    async fn read_all(&self) -> Res<BTreeMap<String, String>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Unable to read the storage file {}", self.path.display())
                })
            }
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse the storage file {}", self.path.display()))
    }

    async fn write_all(&self, data: &BTreeMap<String, String>) -> Res<()> {
        let json = serde_json::to_string_pretty(data).context("Unable to serialize storage")?;
        let tmp = self.path.with_extension("json.tmp");
        utils::write(&tmp, json).await?;
        utils::rename(&tmp, &self.path).await
    }
}

#[async_trait::async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        trace!("get {key} from {}", self.path.display());
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        trace!("set {key} in {}", self.path.display());
        let mut data = self.read_all().await?;
        data.insert(key.to_string(), value.to_string());
        self.write_all(&data).await
    }

    async fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        trace!("remove {key} from {}", self.path.display());
        let mut data = self.read_all().await?;
        if data.remove(key).is_some() {
            self.write_all(&data).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("storage.json"));
        assert_eq!(store.get("anything").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        let mut store = FileStore::new(&path);
        store.set("a", "[1,2]").await.unwrap();
        store.set("b", "x").await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("[1,2]"));

        // A second handle on the same file sees the same data.
        let other = FileStore::new(&path);
        assert_eq!(other.get("b").await.unwrap().as_deref(), Some("x"));

        store.remove("a").await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);
        assert_eq!(store.get("b").await.unwrap().as_deref(), Some("x"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        utils::write(&path, "not json").await.unwrap();
        let mut store = FileStore::new(&path);
        assert!(store.get("a").await.is_err());
        assert!(store.set("a", "1").await.is_err());
        // The broken file is left alone.
        assert_eq!(utils::read(&path).await.unwrap(), "not json");
    }
}
