//! Durable storage for the history and favorites collections.
//!
//! Storage is a key-value boundary: implementations persist opaque string
//! values under stable keys. [`PersistenceBridge`] sits on top and owns the
//! policy the workflow relies on: fail-open loads (absent or corrupt data
//! yields empty collections, never an error) and best-effort writes (failures
//! are logged, not surfaced).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::types::Recipe;

/// Storage key for the history collection.
pub const HISTORY_KEY: &str = "recipe_history";

/// Storage key for the favorites collection.
pub const FAVORITES_KEY: &str = "recipe_favorites";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Key-value durable storage boundary.
///
/// Implemented differently by embedders (browser local storage, app data
/// files); a file-per-key implementation and an in-memory implementation
/// ship here.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Read the value stored under a key, or None if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write the value stored under a key, replacing any previous value.
    async fn put(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// File-per-key store under a data directory: `{dir}/{key}.json`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default data directory: `SKILLET_DATA_DIR` if set, else `~/.skillet`.
    pub fn default_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("SKILLET_DATA_DIR") {
            return PathBuf::from(dir);
        }
        dirs::home_dir()
            .map(|h| h.join(".skillet"))
            .unwrap_or_else(|| PathBuf::from("data"))
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl StorageBackend for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(tokio::fs::read_to_string(&path).await?))
    }

    async fn put(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.key_path(key), value).await?;
        Ok(())
    }
}

/// In-memory store for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a key, e.g. with corrupt data for fail-open tests.
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

#[async_trait]
impl StorageBackend for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    async fn put(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Loads and saves the two durable collections across the storage boundary.
pub struct PersistenceBridge {
    store: Box<dyn StorageBackend>,
}

impl PersistenceBridge {
    pub fn new(store: Box<dyn StorageBackend>) -> Self {
        Self { store }
    }

    /// File-backed bridge under the default data directory.
    pub fn on_disk(dir: Option<&Path>) -> Self {
        let dir = dir
            .map(Path::to_path_buf)
            .unwrap_or_else(FileStore::default_dir);
        Self::new(Box::new(FileStore::new(dir)))
    }

    /// Load history and favorites. Absent or corrupt data yields empty
    /// collections; this never fails.
    pub async fn load(&self) -> (Vec<Recipe>, Vec<Recipe>) {
        (
            self.load_key(HISTORY_KEY).await,
            self.load_key(FAVORITES_KEY).await,
        )
    }

    async fn load_key(&self, key: &str) -> Vec<Recipe> {
        match self.store.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(recipes) => recipes,
                Err(e) => {
                    tracing::warn!(key = key, error = %e, "stored collection is corrupt, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(key = key, error = %e, "failed to read stored collection, starting empty");
                Vec::new()
            }
        }
    }

    /// Write both collections. Best-effort: failures are logged and not
    /// surfaced to the caller.
    pub async fn save(&mut self, history: &[Recipe], favorites: &[Recipe]) {
        self.save_key(HISTORY_KEY, history).await;
        self.save_key(FAVORITES_KEY, favorites).await;
    }

    async fn save_key(&mut self, key: &str, recipes: &[Recipe]) {
        let raw = match serde_json::to_string(recipes) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key = key, error = %e, "failed to serialize collection");
                return;
            }
        };
        if let Err(e) = self.store.put(key, &raw).await {
            tracing::warn!(key = key, error = %e, "failed to write collection");
        }
    }
}
