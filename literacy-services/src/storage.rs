//! Profile-scoped blob storage
//!
//! Every persistent feature keeps one JSON blob per key, wrapped in a
//! versioned envelope. A missing key, an unparseable blob, and a schema
//! version mismatch all read as absent; the store never surfaces them as
//! errors, so callers fall back to their defaults.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Blob store scoped to one user profile.
pub trait ProfileStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
    fn remove_item(&self, key: &str);
}

/// In-memory storage for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.read().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items
            .write()
            .insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        self.items.write().remove(key);
    }
}

/// One file per key under a profile directory.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Opens the profile directory, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl ProfileStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Some(value),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(key, error = %err, "failed to read storage file");
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) {
        if let Err(err) = std::fs::write(self.path_for(key), value) {
            warn!(key, error = %err, "failed to write storage file");
        }
    }

    fn remove_item(&self, key: &str) {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!(key, error = %err, "failed to remove storage file"),
        }
    }
}

/// Envelope wrapping every persisted blob.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Versioned<T> {
    pub schema_version: u32,
    pub data: T,
}

/// Loads and unwraps a versioned blob.
pub(crate) fn load_versioned<T: DeserializeOwned>(
    storage: &dyn ProfileStorage,
    key: &str,
    version: u32,
) -> Option<T> {
    let raw = storage.get_item(key)?;

    let envelope: Versioned<T> = match serde_json::from_str(&raw) {
        Ok(envelope) => envelope,
        Err(err) => {
            warn!(key, error = %err, "discarding corrupt blob");
            return None;
        }
    };

    if envelope.schema_version != version {
        warn!(
            key,
            found = envelope.schema_version,
            expected = version,
            "discarding blob with mismatched schema version"
        );
        return None;
    }

    Some(envelope.data)
}

/// Serializes a blob into its versioned envelope and persists it.
pub(crate) fn save_versioned<T: Serialize>(
    storage: &dyn ProfileStorage,
    key: &str,
    version: u32,
    data: &T,
) {
    let envelope = Versioned {
        schema_version: version,
        data,
    };
    match serde_json::to_string(&envelope) {
        Ok(raw) => storage.set_item(key, &raw),
        Err(err) => warn!(key, error = %err, "failed to serialize blob"),
    }
}

/// Removes every blob the services write for this profile.
pub fn clear_all_data(storage: &dyn ProfileStorage) {
    for key in [
        crate::cache::CACHE_KEY,
        crate::saved::SAVED_ITEMS_KEY,
        crate::saved::SUBSCRIPTIONS_KEY,
        crate::game::GAME_KEY,
        crate::discussions::DISCUSSIONS_KEY,
    ] {
        storage.remove_item(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trips_and_removes() {
        let storage = MemoryStorage::new();

        assert!(storage.get_item("missing").is_none());

        storage.set_item("greeting", "hello");
        assert_eq!(storage.get_item("greeting").as_deref(), Some("hello"));

        storage.remove_item("greeting");
        assert!(storage.get_item("greeting").is_none());
    }

    #[test]
    fn file_storage_round_trips_and_removes() {
        let dir = std::env::temp_dir().join(format!("literacy-storage-{}", std::process::id()));
        let storage = FileStorage::new(&dir).unwrap();

        storage.set_item("greeting", "hello");
        assert_eq!(storage.get_item("greeting").as_deref(), Some("hello"));

        storage.remove_item("greeting");
        assert!(storage.get_item("greeting").is_none());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn versioned_blobs_round_trip() {
        let storage = MemoryStorage::new();

        save_versioned(&storage, "numbers", 1, &vec![1u32, 2, 3]);
        let loaded: Option<Vec<u32>> = load_versioned(&storage, "numbers", 1);

        assert_eq!(loaded, Some(vec![1, 2, 3]));
    }

    #[test]
    fn corrupt_blobs_read_as_absent() {
        let storage = MemoryStorage::new();
        storage.set_item("numbers", "{ not json");

        let loaded: Option<Vec<u32>> = load_versioned(&storage, "numbers", 1);

        assert!(loaded.is_none());
    }

    #[test]
    fn mismatched_schema_versions_are_discarded() {
        let storage = MemoryStorage::new();
        save_versioned(&storage, "numbers", 1, &vec![1u32, 2, 3]);

        let loaded: Option<Vec<u32>> = load_versioned(&storage, "numbers", 2);

        assert!(loaded.is_none());
    }

    #[test]
    fn clear_all_data_removes_every_service_key() {
        let storage = MemoryStorage::new();
        for key in [
            crate::cache::CACHE_KEY,
            crate::saved::SAVED_ITEMS_KEY,
            crate::saved::SUBSCRIPTIONS_KEY,
            crate::game::GAME_KEY,
            crate::discussions::DISCUSSIONS_KEY,
        ] {
            storage.set_item(key, "{}");
        }

        clear_all_data(&storage);

        assert!(storage.get_item(crate::cache::CACHE_KEY).is_none());
        assert!(storage.get_item(crate::game::GAME_KEY).is_none());
        assert!(storage.get_item(crate::discussions::DISCUSSIONS_KEY).is_none());
    }
}
