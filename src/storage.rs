//! Key/value storage standing in for the browser's local storage.
//!
//! Values are opaque strings, exactly like `localStorage`. The file-backed
//! store keeps every item in memory and rewrites the whole file on each
//! mutation.

use serde::{Serialize, de::DeserializeOwned};
use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};
use tokio::fs;
use tracing::{error, warn};

pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: String) -> io::Result<()>;
    fn remove_item(&self, key: &str) -> io::Result<()>;
}

/// Reads and decodes a JSON value. Missing or malformed values read as `None`.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get_item(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, "ignoring malformed stored value: {err}");
            None
        }
    }
}

pub fn write_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> io::Result<()> {
    let payload = serde_json::to_string(value).map_err(io::Error::other)?;
    store.set_item(key, payload)
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: String) -> io::Result<()> {
        self.items().insert(key.to_string(), value);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> io::Result<()> {
        self.items().remove(key);
        Ok(())
    }
}

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    items: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    pub async fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let items = load_items(&path).await;
        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    fn items(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Writes a sibling temp file and renames it over the store, so a crash
    /// mid-write leaves the previous contents intact.
    fn persist(&self, items: &BTreeMap<String, String>) -> io::Result<()> {
        let payload = serde_json::to_vec_pretty(items).map_err(io::Error::other)?;
        let staging = staging_path(&self.path);
        std::fs::write(&staging, payload)?;
        std::fs::rename(&staging, &self.path)
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: String) -> io::Result<()> {
        let mut items = self.items();
        items.insert(key.to_string(), value);
        self.persist(&items)
    }

    fn remove_item(&self, key: &str) -> io::Result<()> {
        let mut items = self.items();
        if items.remove(key).is_some() {
            self.persist(&items)?;
        }
        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

async fn load_items(path: &Path) -> BTreeMap<String, String> {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(items) => items,
            Err(err) => {
                error!("failed to parse storage file: {err}");
                BTreeMap::new()
            }
        },
        Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
        Err(err) => {
            error!("failed to read storage file: {err}");
            BTreeMap::new()
        }
    }
}
