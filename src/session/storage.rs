//! Key-value storage backing the local session.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::{collections::HashMap, io::ErrorKind, path::PathBuf, sync::Mutex};
use tokio::{
    fs,
    io::{AsyncWriteExt, BufWriter},
};

/// String key-value store holding the serialized session entries.
#[async_trait]
pub trait LocalStorage: Send + Sync {
    /// Value stored under `key`, if any.
    async fn get_item(&self, key: &str) -> Result<Option<String>>;
    /// Store or replace the value under `key`.
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;
    /// Drop `key` if present.
    async fn remove_item(&self, key: &str) -> Result<()>;
    /// Drop every entry.
    async fn clear(&self) -> Result<()>;
}

/// In-process storage, lost on exit.
#[derive(Default)]
pub struct MemoryStorage {
    store: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.store
            .lock()
            .map_err(|_| anyhow::anyhow!("memory storage lock poisoned"))
    }
}

#[async_trait]
impl LocalStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.lock()?.clear();
        Ok(())
    }
}

/// Stores entries in a local JSON file (e.g. `local_storage.json`).
#[derive(Clone)]
pub struct FileStorage {
    /// Location of the storage file on disk.
    path: PathBuf,
}

impl FileStorage {
    /// Create a new storage backed by the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the entire map from disk; a missing file is an empty map.
    async fn load_map(&self) -> Result<HashMap<String, String>> {
        match fs::read(&self.path).await {
            Ok(data) => {
                if data.is_empty() {
                    return Ok(HashMap::new());
                }
                serde_json::from_slice(&data)
                    .with_context(|| format!("invalid storage file {}", self.path.display()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist the map to disk, creating directories if needed.
    async fn save_map(&self, map: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }
        let data = serde_json::to_vec_pretty(map)?;
        let file = fs::File::create(&self.path).await?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&data).await?;
        writer.flush().await?;
        tracing::debug!("storage saved: {} entries", map.len());
        Ok(())
    }
}

#[async_trait]
impl LocalStorage for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let mut map = self.load_map().await?;
        Ok(map.remove(key))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.load_map().await?;
        map.insert(key.to_string(), value.to_string());
        self.save_map(&map).await
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        let mut map = self.load_map().await?;
        if map.remove(key).is_some() {
            self.save_map(&map).await?;
        }
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.save_map(&HashMap::new()).await
    }
}
