//! File-backed key/value storage
//!
//! Each key is a file in the data directory:
//! - `bookmarks.json` - bookmarked IDs
//! - `highlights.json` - captured highlights
//! - `journal.md` - the reflection journal
//!
//! Writes are atomic (write to temp file, then rename) so a crash never
//! leaves a half-written value behind.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StorageError, StorageKey, StorageResult};

/// Persistence handler rooted at a data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    pub fn path(&self, key: StorageKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Whether a value is stored under `key`
    pub fn exists(&self, key: StorageKey) -> bool {
        self.path(key).exists()
    }

    /// Total bytes on disk across all keys
    pub fn total_size(&self) -> u64 {
        StorageKey::ALL
            .iter()
            .filter_map(|key| fs::metadata(self.path(*key)).ok())
            .map(|meta| meta.len())
            .sum()
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: StorageKey) -> StorageResult<Option<String>> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| StorageError::from_read(e, path))
    }

    fn write(&self, key: StorageKey, value: &str) -> StorageResult<()> {
        atomic_write(&self.path(key), value.as_bytes())
    }

    fn remove(&self, key: StorageKey) -> StorageResult<()> {
        let path = self.path(key);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| StorageError::from_write(e, path))?;
        }
        Ok(())
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_write(e, temp_path.clone()))?;
    file.write_all(data)
        .map_err(|e| StorageError::from_write(e, temp_path.clone()))?;
    file.sync_all()
        .map_err(|e| StorageError::from_write(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_key() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        assert!(!store.exists(StorageKey::Journal));
        assert!(store.read(StorageKey::Journal).unwrap().is_none());
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        store.write(StorageKey::Bookmarks, r#"["a","b"]"#).unwrap();
        assert!(store.exists(StorageKey::Bookmarks));
        assert_eq!(
            store.read(StorageKey::Bookmarks).unwrap().as_deref(),
            Some(r#"["a","b"]"#)
        );

        // Keys are independent files
        assert!(store.read(StorageKey::Highlights).unwrap().is_none());
    }

    #[test]
    fn test_overwrite_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        store.write(StorageKey::Journal, "first").unwrap();
        store.write(StorageKey::Journal, "second").unwrap();

        assert_eq!(
            store.read(StorageKey::Journal).unwrap().as_deref(),
            Some("second")
        );
        assert!(!store.path(StorageKey::Journal).with_extension("tmp").exists());
    }

    #[test]
    fn test_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        store.write(StorageKey::Highlights, "[]").unwrap();
        store.remove(StorageKey::Highlights).unwrap();
        assert!(!store.exists(StorageKey::Highlights));

        // Removing again is fine
        store.remove(StorageKey::Highlights).unwrap();
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("a").join("b"));

        store.write(StorageKey::Journal, "nested").unwrap();
        let content = fs::read_to_string(store.path(StorageKey::Journal)).unwrap();
        assert_eq!(content, "nested");
    }

    #[test]
    fn test_total_size() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        assert_eq!(store.total_size(), 0);

        store.write(StorageKey::Journal, "12345").unwrap();
        store.write(StorageKey::Bookmarks, "[]").unwrap();
        assert_eq!(store.total_size(), 7);
    }
}
