//! Column preference storage.
//!
//! The toolbar persists the user's column choices through a
//! [`PreferenceStore`]: a flat map from a caller-built key to a list of
//! column identifiers. Keys combine the dataset kind with the purpose, see
//! [`columns_key`] and [`list_elements_key`].
//!
//! [`MemoryStore`] is the bundled implementation. It keeps everything in
//! memory, announces writes through a signal and can persist itself to a
//! JSON file:
//!
//! ```ignore
//! use rowline::store::{MemoryStore, PreferenceStore};
//!
//! let store = MemoryStore::load_json("prefs.json")?;
//! store.set_auto_save("prefs.json");
//!
//! // Written to disk right away.
//! store.set("columns-Person", vec!["name".into(), "mail".into()]);
//! ```

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use rowline_core::Signal;
use rowline_core::logging::targets;

use crate::error::{Error, Result};

/// Key under which the shown table columns of a dataset kind are stored.
pub fn columns_key(dataset_kind: &str) -> String {
    format!("columns-{dataset_kind}")
}

/// Key under which the additional list elements of a dataset kind are
/// stored.
pub fn list_elements_key(dataset_kind: &str) -> String {
    format!("list-elements-{dataset_kind}")
}

/// A key/value store for column identifier lists.
///
/// Reads and writes are fire-and-forget: a missing key reads as an empty
/// list, and the last write wins.
pub trait PreferenceStore: Send + Sync {
    /// The identifiers stored under `key`, or an empty list.
    fn get(&self, key: &str) -> Vec<String>;

    /// Stores `identifiers` under `key`.
    fn set(&self, key: &str, identifiers: Vec<String>);
}

/// An in-memory [`PreferenceStore`] with optional JSON persistence.
///
/// # Signals
///
/// - `changed()`: emitted with the key after every write
pub struct MemoryStore {
    data: RwLock<HashMap<String, Vec<String>>>,
    changed: Signal<String>,
    auto_save: RwLock<Option<PathBuf>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("keys", &self.data.read().len())
            .field("auto_save", &*self.auto_save.read())
            .finish()
    }
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::from_data(HashMap::new())
    }

    /// Creates a store holding `data`.
    pub fn from_data(data: HashMap<String, Vec<String>>) -> Self {
        Self {
            data: RwLock::new(data),
            changed: Signal::new(),
            auto_save: RwLock::new(None),
        }
    }

    /// Returns a reference to the changed signal.
    pub fn changed(&self) -> &Signal<String> {
        &self.changed
    }

    /// Persists the store to `path` after every write.
    pub fn set_auto_save(&self, path: impl AsRef<Path>) {
        *self.auto_save.write() = Some(path.as_ref().to_path_buf());
    }

    /// Disables auto-save.
    pub fn disable_auto_save(&self) {
        *self.auto_save.write() = None;
    }

    /// Returns true if auto-save is enabled.
    pub fn is_auto_save_enabled(&self) -> bool {
        self.auto_save.read().is_some()
    }

    /// Removes the entry for `key`.
    pub fn remove(&self, key: &str) -> Option<Vec<String>> {
        let removed = self.data.write().remove(key);
        if removed.is_some() {
            self.changed.emit(key.to_string());
            self.try_auto_save();
        }
        removed
    }

    /// All stored keys.
    pub fn keys(&self) -> Vec<String> {
        self.data.read().keys().cloned().collect()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Loads a store from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::store_io(path, e))?;
        let data = serde_json::from_str(&content).map_err(|e| Error::store_format(path, e))?;
        Ok(Self::from_data(data))
    }

    /// Saves the store to a JSON file.
    ///
    /// The file is written to a temporary file in the same directory first
    /// and renamed into place, so readers never see a partial file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&*self.data.read())
            .map_err(|e| Error::store_format(path, e))?;

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut file = tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::store_io(path, e))?;
        file.write_all(json.as_bytes())
            .and_then(|()| file.as_file().sync_all())
            .map_err(|e| Error::store_io(path, e))?;
        file.persist(path).map_err(|e| Error::store_io(path, e.error))?;

        tracing::debug!(target: targets::STORE, path = %path.display(), "preferences saved");
        Ok(())
    }

    /// Saves to the auto-save path, if one is set.
    pub fn sync(&self) -> Result<()> {
        let path = self.auto_save.read().clone();
        match path {
            Some(path) => self.save_json(path),
            None => Ok(()),
        }
    }

    fn try_auto_save(&self) {
        if let Err(e) = self.sync() {
            tracing::error!(target: targets::STORE, "Failed to auto-save preferences: {}", e);
        }
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Vec<String> {
        self.data.read().get(key).cloned().unwrap_or_default()
    }

    fn set(&self, key: &str, identifiers: Vec<String>) {
        tracing::debug!(target: targets::STORE, key, count = identifiers.len(), "preference written");
        self.data.write().insert(key.to_string(), identifiers);
        self.changed.emit(key.to_string());
        self.try_auto_save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_keys() {
        assert_eq!(columns_key("Person"), "columns-Person");
        assert_eq!(list_elements_key("Person"), "list-elements-Person");
    }

    #[test]
    fn test_missing_key_reads_empty() {
        let store = MemoryStore::new();
        assert!(store.get("columns-Person").is_empty());
    }

    #[test]
    fn test_set_emits_changed() {
        let store = MemoryStore::new();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        store.changed().connect(move |key: &String| {
            assert_eq!(key, "columns-Person");
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        store.set("columns-Person", ids(&["name"]));
        store.set("columns-Person", ids(&["name", "mail"]));

        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(store.get("columns-Person"), ids(&["name", "mail"]));
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let store = MemoryStore::new();
        store.set("columns-Person", ids(&["name", "status"]));
        store.set("list-elements-Person", Vec::new());
        store.save_json(&path).unwrap();

        let loaded = MemoryStore::load_json(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("columns-Person"), ids(&["name", "status"]));
        assert!(loaded.get("list-elements-Person").is_empty());
    }

    #[test]
    fn test_auto_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let store = MemoryStore::new();
        store.set_auto_save(&path);
        assert!(store.is_auto_save_enabled());
        store.set("columns-Person", ids(&["name"]));

        let loaded = MemoryStore::load_json(&path).unwrap();
        assert_eq!(loaded.get("columns-Person"), ids(&["name"]));

        store.remove("columns-Person");
        assert!(MemoryStore::load_json(&path).unwrap().is_empty());
    }

    #[test]
    fn test_load_errors_carry_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            MemoryStore::load_json(&missing),
            Err(Error::StoreIo { .. })
        ));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "not json").unwrap();
        match MemoryStore::load_json(&broken) {
            Err(Error::StoreFormat { path, .. }) => assert_eq!(path, broken),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
