//! File-backed substrate: one JSON document holding all keys.
//!
//! This is the durable analog of a browser's local storage for terminal
//! hosts. The whole document is rewritten on every mutation, which is fine
//! for the handful of small keys this store is meant for. Single-process
//! use is assumed; there is no cross-process locking.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::backend::{StorageBackend, StorageError};

/// A [`StorageBackend`] persisted as a single pretty-printed JSON file.
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl JsonFileBackend {
    /// Open (or create) the store at `path`.
    ///
    /// A missing file starts an empty store; a present file must parse as
    /// a JSON string map.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_owned();
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "storage file absent, starting empty");
                HashMap::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    async fn persist(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        let doc = serde_json::to_string_pretty(entries)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, doc).await?;
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for JsonFileBackend {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_owned(), value.to_owned());
        self.persist(&entries).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().await;
        if entries.remove(key).is_some() {
            self.persist(&entries).await?;
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().await;
        entries.clear();
        self.persist(&entries).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_through_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        {
            let backend = JsonFileBackend::open(&path).await.unwrap();
            backend.write("greeting", "\"hello\"").await.unwrap();
            backend.write("gone", "1").await.unwrap();
            backend.delete("gone").await.unwrap();
        }

        // A fresh handle sees what the first one persisted.
        let backend = JsonFileBackend::open(&path).await.unwrap();
        assert_eq!(
            backend.read("greeting").await.unwrap().as_deref(),
            Some("\"hello\"")
        );
        assert_eq!(backend.read("gone").await.unwrap(), None);
    }

    #[tokio::test]
    async fn clear_empties_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let backend = JsonFileBackend::open(&path).await.unwrap();
        backend.write("a", "1").await.unwrap();
        backend.write("b", "2").await.unwrap();
        backend.clear().await.unwrap();

        assert_eq!(backend.read("a").await.unwrap(), None);
        let reopened = JsonFileBackend::open(&path).await.unwrap();
        assert_eq!(reopened.read("b").await.unwrap(), None);
    }
}
