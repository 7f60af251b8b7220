//! File-backed key-value store.
//!
//! The whole store is one JSON object (`{"key": "text", ...}`) on disk, the
//! native stand-in for a browser origin's local storage. Every write rewrites
//! the document through a temporary file and a rename so a crash never leaves
//! a half-written document behind.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{KeyValueStore, Result, StorageError};

type Document = BTreeMap<String, String>;

/// Key-value store persisted to a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process only.
    lock: Mutex<()>,
}

impl FileStore {
    /// Open (lazily) the store at `path`.
    ///
    /// The file and its parent directories are created on the first write; a
    /// missing file reads as an empty store.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Document> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Document::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if text.trim().is_empty() {
            return Ok(Document::new());
        }

        serde_json::from_str(&text).map_err(|source| StorageError::Document {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, document: &Document) -> Result<()> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let text = serde_json::to_string_pretty(document).map_err(|source| {
            StorageError::Document {
                path: self.path.clone(),
                source,
            }
        })?;

        let tmp = self.temp_path();
        fs::write(&tmp, text).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(|source| {
            let _ = fs::remove_file(&tmp);
            io_err(source)
        })
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map_or_else(|| "storage".into(), |n| n.to_string_lossy().into_owned());
        self.path
            .with_file_name(format!(".{name}.{}.tmp", uuid::Uuid::new_v4().simple()))
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.guard()?;
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.guard()?;
        let mut document = self.load()?;
        document.insert(key.to_string(), value.to_string());
        self.save(&document)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn temp_store_path() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("origin").join("storage.json");
        (dir, path)
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let (_dir, path) = temp_store_path();
        let store = FileStore::new(path);
        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[test]
    fn test_set_creates_file_and_persists() {
        let (_dir, path) = temp_store_path();
        let store = FileStore::new(&path);
        store.set("cloudmart_cart", "[]").unwrap();
        store.set("cloudmart_user", "{}").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("cloudmart_cart").unwrap().as_deref(), Some("[]"));
        assert_eq!(reopened.get("cloudmart_user").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_unreadable_document() {
        let (_dir, path) = temp_store_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not a json object").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(store.get("k"), Err(StorageError::Document { .. })));
        assert!(matches!(store.set("k", "v"), Err(StorageError::Document { .. })));
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let (_dir, path) = temp_store_path();
        let store = FileStore::new(&path);
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        let entries = fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_scratch_dir_removed_on_drop() {
        let (dir, path) = temp_store_path();
        FileStore::new(&path).set("k", "v").unwrap();
        let root = dir.path().to_path_buf();
        assert!(path.exists());

        drop(dir);
        assert!(!root.exists());
    }
}
