//! JSON key-value persistence
//!
//! Maps a namespaced key to a JSON document, one file per key under the
//! data directory. Uses atomic writes (write to temp file, then rename) to
//! prevent corruption.
//!
//! Each key is read from disk at most once per session and cached in
//! memory; every write updates the cache and the medium together. A write
//! that fails at the medium leaves the cache (and previously persisted
//! keys) intact, so in-memory state stays authoritative for the session.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use super::error::{StorageError, StorageResult};

/// Namespaced JSON store with a write-through in-memory cache
pub struct JsonStore {
    dir: PathBuf,
    cache: HashMap<String, Value>,
}

impl JsonStore {
    /// Open a store rooted at the given directory
    ///
    /// The directory is created lazily on the first write.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: HashMap::new(),
        }
    }

    /// Path of the file backing a key
    pub fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Read the value stored under `key`, or `default` when the key is
    /// absent or its file cannot be parsed
    ///
    /// Corruption self-heals: an unreadable or unparseable file falls back
    /// to the default instead of propagating an error. Served from the
    /// cache after the first disk read.
    pub fn read<T: DeserializeOwned>(&mut self, key: &str, default: T) -> T {
        if !self.cache.contains_key(key) {
            let loaded = self.load_from_disk(key);
            self.cache.insert(key.to_string(), loaded);
        }

        let value = self.cache.get(key).cloned().unwrap_or(Value::Null);
        match serde_json::from_value(value) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(key, error = %e, "stored value did not match expected shape, using default");
                default
            }
        }
    }

    /// Serialize `value` and persist it under `key`
    ///
    /// The cache is updated before the medium is touched; a medium failure
    /// is returned to the caller but never rolls the cache back.
    pub fn write<T: Serialize>(&mut self, key: &str, value: &T) -> StorageResult<()> {
        let json = serde_json::to_value(value)?;
        let bytes = serde_json::to_vec_pretty(&json)?;
        self.cache.insert(key.to_string(), json);

        atomic_write(&self.key_path(key), &bytes)
    }

    /// Check whether a key has ever been persisted
    pub fn exists(&self, key: &str) -> bool {
        self.key_path(key).exists()
    }

    /// Size in bytes of the file backing a key, if present
    pub fn file_size(&self, key: &str) -> Option<u64> {
        fs::metadata(self.key_path(key)).ok().map(|m| m.len())
    }

    /// Load a key's raw JSON from disk; absence and corruption both map to
    /// `Value::Null` so `read` can substitute the default
    fn load_from_disk(&self, key: &str) -> Value {
        let path = self.key_path(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Value::Null,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read stored value");
                return Value::Null;
            }
        };

        match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "stored value is corrupt, treating as absent");
                Value::Null
            }
        }
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|e| StorageError::from_io(e, path.to_path_buf()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_key_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = JsonStore::open(temp_dir.path());

        let value: Vec<String> = store.read("books", vec!["fallback".to_string()]);
        assert_eq!(value, vec!["fallback".to_string()]);
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = JsonStore::open(temp_dir.path());

        store.write("books", &vec![1, 2, 3]).unwrap();
        assert!(store.exists("books"));

        let value: Vec<i32> = store.read("books", Vec::new());
        assert_eq!(value, vec![1, 2, 3]);
    }

    #[test]
    fn test_read_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();

        {
            let mut store = JsonStore::open(temp_dir.path());
            store.write("books", &vec!["dune".to_string()]).unwrap();
        }

        let mut store = JsonStore::open(temp_dir.path());
        let value: Vec<String> = store.read("books", Vec::new());
        assert_eq!(value, vec!["dune".to_string()]);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_default() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = JsonStore::open(temp_dir.path());

        fs::write(store.key_path("books"), "{not json at all").unwrap();

        let value: Vec<i32> = store.read("books", vec![7]);
        assert_eq!(value, vec![7]);
    }

    #[test]
    fn test_wrong_shape_falls_back_to_default() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = JsonStore::open(temp_dir.path());

        fs::write(store.key_path("books"), "\"a plain string\"").unwrap();

        let value: Vec<i32> = store.read("books", Vec::new());
        assert!(value.is_empty());
    }

    #[test]
    fn test_read_is_cached_after_first_load() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = JsonStore::open(temp_dir.path());

        store.write("counter", &1).unwrap();
        let _: i32 = store.read("counter", 0);

        // Mutate the file behind the store's back; the cached value wins
        fs::write(store.key_path("counter"), "99").unwrap();
        let value: i32 = store.read("counter", 0);
        assert_eq!(value, 1);
    }

    #[test]
    fn test_failed_write_keeps_cache_authoritative() {
        let temp_dir = TempDir::new().unwrap();

        // Point the store at a path that is a file, so directory creation
        // (and therefore every medium write) fails.
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let mut store = JsonStore::open(blocker.join("data"));

        let result = store.write("books", &vec!["dune".to_string()]);
        assert!(result.is_err());

        // The in-memory value is still served for the rest of the session
        let value: Vec<String> = store.read("books", Vec::new());
        assert_eq!(value, vec!["dune".to_string()]);
    }

    #[test]
    fn test_failed_write_does_not_corrupt_previous_data() {
        let temp_dir = TempDir::new().unwrap();

        {
            let mut store = JsonStore::open(temp_dir.path());
            store.write("books", &vec!["dune".to_string()]).unwrap();
        }

        // Replace the directory entry for the temp file with a directory so
        // the next atomic write fails before the rename.
        let temp_path = temp_dir.path().join("books.tmp");
        fs::create_dir(&temp_path).unwrap();

        let mut store = JsonStore::open(temp_dir.path());
        let result = store.write("books", &vec!["emma".to_string()]);
        assert!(result.is_err());

        // Previously persisted data is untouched
        let mut fresh = JsonStore::open(temp_dir.path());
        let value: Vec<String> = fresh.read("books", Vec::new());
        assert_eq!(value, vec!["dune".to_string()]);
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir.path().join("a").join("b").join("file.json");

        atomic_write(&nested_path, b"true").unwrap();

        assert!(nested_path.exists());
        assert_eq!(fs::read_to_string(&nested_path).unwrap(), "true");
    }
}
