//! Session token storage.
//!
//! The admin token lives in persistent local storage, is read before every
//! request, and is cleared on any 401 response.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

const TOKEN_KEY: &str = "keyhub:admin_token";

/// Storage adapter trait for custom storage implementations.
pub trait StorageAdapter: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Handle to the stored session. Cheap to clone; all clones observe the
/// same underlying adapter, so clearing the token in one place clears it
/// everywhere.
#[derive(Clone)]
pub struct SessionStore {
    adapter: Arc<dyn StorageAdapter>,
}

impl SessionStore {
    pub fn new(adapter: Arc<dyn StorageAdapter>) -> Self {
        Self { adapter }
    }

    /// In-memory session, for tests and ephemeral use.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub fn token(&self) -> Option<String> {
        self.adapter.get(TOKEN_KEY)
    }

    pub fn set_token(&self, token: &str) {
        self.adapter.set(TOKEN_KEY, token);
    }

    pub fn clear(&self) {
        self.adapter.remove(TOKEN_KEY);
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

/// In-memory storage adapter.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    store: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageAdapter for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.store.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut store) = self.store.write() {
            store.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut store) = self.store.write() {
            store.remove(key);
        }
    }
}

/// File-based storage adapter.
///
/// Stores data in a JSON file in the app's data directory, e.g.
/// `~/.local/share/{app_name}/session.json` on Linux.
pub struct FileStorage {
    path: PathBuf,
    cache: RwLock<HashMap<String, String>>,
}

impl FileStorage {
    pub fn new(app_name: &str) -> Option<Self> {
        let dirs = directories::ProjectDirs::from("", "", app_name)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir).ok()?;
        Self::from_path(data_dir.join("session.json"))
    }

    /// Open a storage file at an explicit path.
    pub fn from_path(path: PathBuf) -> Option<Self> {
        let cache = if path.exists() {
            let contents = std::fs::read_to_string(&path).ok()?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            HashMap::new()
        };

        Some(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    fn save(&self) {
        if let Ok(cache) = self.cache.read() {
            if let Ok(contents) = serde_json::to_string_pretty(&*cache) {
                let _ = std::fs::write(&self.path, contents);
            }
        }
    }
}

impl StorageAdapter for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.cache.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key.to_string(), value.to_string());
        }
        self.save();
    }

    fn remove(&self, key: &str) {
        if let Ok(mut cache) = self.cache.write() {
            cache.remove(key);
        }
        self.save();
    }
}

impl std::fmt::Debug for FileStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStorage")
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_same_token() {
        let session = SessionStore::in_memory();
        let other = session.clone();

        session.set_token("abc123");
        assert_eq!(other.token().as_deref(), Some("abc123"));

        other.clear();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        {
            let storage = FileStorage::from_path(path.clone()).unwrap();
            let session = SessionStore::new(Arc::new(storage));
            session.set_token("persisted");
        }

        let storage = FileStorage::from_path(path).unwrap();
        let session = SessionStore::new(Arc::new(storage));
        assert_eq!(session.token().as_deref(), Some("persisted"));
    }
}
