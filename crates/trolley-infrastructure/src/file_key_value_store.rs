//! File-backed key-value store.
//!
//! Stores one file per key under a base directory. Writes go through a
//! temporary file with an fsync and an atomic rename, guarded by an
//! exclusive lock file, so a crashed write never leaves a torn value behind.

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use trolley_core::TrolleyError;
use trolley_core::error::Result;
use trolley_core::storage::KeyValueStore;

use crate::paths::TrolleyPaths;

/// Device-local key-value store backed by one file per key.
pub struct FileKeyValueStore {
    /// Base directory all entries live under.
    base_dir: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store rooted at the platform data directory.
    pub fn new() -> Result<Self> {
        let base_dir =
            TrolleyPaths::data_dir().map_err(|e| TrolleyError::config(e.to_string()))?;
        Ok(Self { base_dir })
    }

    /// Creates a store rooted at a custom base directory (for testing).
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Returns the file path an entry is stored at.
    ///
    /// Key characters outside `[A-Za-z0-9._-]` map to `_`. Keys are short
    /// namespaced constants, so sanitized names stay distinct in practice.
    fn entry_path(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_dir.join(file_name)
    }

    /// Writes a value to its entry file atomically.
    ///
    /// Uses a temporary file + atomic rename; the value is fsynced before
    /// the rename publishes it.
    fn write_atomically(path: &Path, value: &str) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| TrolleyError::io("entry path has no parent directory"))?;
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }

        let _lock = FileLock::acquire(path)?;

        let file_name = path
            .file_name()
            .ok_or_else(|| TrolleyError::io("entry path has no file name"))?;
        let tmp_path = parent.join(format!(".{}.tmp", file_name.to_string_lossy()));

        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(value.as_bytes())?;

        // Ensure data is written to disk before the rename publishes it
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, path)?;

        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key);

        if !path.exists() {
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            TrolleyError::io(format!("Failed to read entry for key '{}': {}", key, e))
        })?;

        Ok(Some(content))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.entry_path(key);
        let value = value.to_string();

        tokio::task::spawn_blocking(move || Self::write_atomically(&path, &value))
            .await
            .map_err(|e| TrolleyError::internal(format!("Failed to join storage task: {}", e)))??;

        Ok(())
    }
}

/// A file lock guard that automatically releases the lock when dropped.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    /// Acquires an exclusive lock next to the given entry path.
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| TrolleyError::io(format!("Failed to acquire lock: {}", e)))?;
        }

        #[cfg(not(unix))]
        {
            // No file locking on non-Unix systems; single-user device storage
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock is automatic when the file handle is dropped
        let _ = fs::remove_file(&self.lock_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_get_absent_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(store.get("@trolley:cart").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::with_base_dir(temp_dir.path().to_path_buf());

        store.set("@trolley:cart", "[1,2,3]").await.unwrap();

        assert_eq!(
            store.get("@trolley:cart").await.unwrap(),
            Some("[1,2,3]".to_string())
        );
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::with_base_dir(temp_dir.path().to_path_buf());

        store.set("@trolley:cart", "first").await.unwrap();
        store.set("@trolley:cart", "second").await.unwrap();

        assert_eq!(
            store.get("@trolley:cart").await.unwrap(),
            Some("second".to_string())
        );
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::with_base_dir(temp_dir.path().to_path_buf());

        store.set("@trolley:cart", "value").await.unwrap();

        let tmp_path = temp_dir.path().join("._trolley_cart.tmp");
        assert!(!tmp_path.exists());
        assert!(temp_dir.path().join("_trolley_cart").exists());
    }

    #[tokio::test]
    async fn test_keys_map_to_distinct_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::with_base_dir(temp_dir.path().to_path_buf());

        store.set("@trolley:cart", "cart").await.unwrap();
        store.set("@trolley:other", "other").await.unwrap();

        assert_eq!(
            store.get("@trolley:cart").await.unwrap(),
            Some("cart".to_string())
        );
        assert_eq!(
            store.get("@trolley:other").await.unwrap(),
            Some("other".to_string())
        );
    }
}
