//! Filesystem storage backend

use crate::error::{Result, StorageError};
use crate::storage::Storage;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const EXTENSION: &str = "json";

/// Filesystem storage backend
///
/// Stores each key as `<encoded key>.json` inside a directory. Persistent
/// across restarts, like browser local storage.
#[derive(Debug, Clone)]
pub struct FilesystemStorage {
    dir: PathBuf,
}

impl FilesystemStorage {
    /// Opens (and creates if needed) a storage directory
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keys are percent-encoded so any key maps to a safe, reversible file name
    ///
    /// The empty key is rejected: it would become the dotfile `.json`, which
    /// has no extension and so would be invisible to `keys` and `clear`.
    fn key_to_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() {
            return Err(StorageError::EmptyKey);
        }
        Ok(self
            .dir
            .join(format!("{}.{}", urlencoding::encode(key), EXTENSION)))
    }

    fn io_error(key: &str, source: std::io::Error) -> StorageError {
        StorageError::Io {
            key: key.to_string(),
            source,
        }
    }
}

impl Storage for FilesystemStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.key_to_path(key)?) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        fs::write(self.key_to_path(key)?, value).map_err(|e| Self::io_error(key, e))
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.key_to_path(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        let dir_key = self.dir.display().to_string();
        let entries = fs::read_dir(&self.dir).map_err(|e| Self::io_error(&dir_key, e))?;

        let mut keys: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(EXTENSION))
            .filter_map(|path| {
                let stem = path.file_stem()?.to_str()?.to_string();
                urlencoding::decode(&stem).ok().map(|k| k.into_owned())
            })
            .collect();

        keys.sort();
        Ok(keys)
    }

    fn clear(&self) -> Result<()> {
        self.keys()?
            .iter()
            .try_for_each(|key| self.remove_item(key))
    }

    fn name(&self) -> &'static str {
        "filesystem"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filesystem_storage_basic() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = FilesystemStorage::new(tmp.path()).unwrap();

        storage.set_item("recent-workspaces", "[]").unwrap();
        assert_eq!(
            storage.get_item("recent-workspaces").unwrap(),
            Some("[]".to_string())
        );
        assert_eq!(storage.get_item("missing").unwrap(), None);

        storage.remove_item("recent-workspaces").unwrap();
        assert_eq!(storage.get_item("recent-workspaces").unwrap(), None);
        storage.remove_item("recent-workspaces").unwrap();
    }

    #[test]
    fn test_filesystem_storage_unsafe_keys_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = FilesystemStorage::new(tmp.path()).unwrap();

        storage.set_item("prefs/user:a b", "1").unwrap();
        storage.set_item("plain", "2").unwrap();

        assert_eq!(storage.keys().unwrap(), vec!["plain", "prefs/user:a b"]);
        assert_eq!(storage.get_item("prefs/user:a b").unwrap(), Some("1".to_string()));
    }

    #[test]
    fn test_filesystem_storage_persists_across_instances() {
        let tmp = tempfile::tempdir().unwrap();
        FilesystemStorage::new(tmp.path())
            .unwrap()
            .set_item("k", "\"v\"")
            .unwrap();

        let reopened = FilesystemStorage::new(tmp.path()).unwrap();
        assert_eq!(reopened.get_item("k").unwrap(), Some("\"v\"".to_string()));

        reopened.clear().unwrap();
        assert!(reopened.keys().unwrap().is_empty());
    }

    #[test]
    fn test_filesystem_storage_rejects_empty_key() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = FilesystemStorage::new(tmp.path()).unwrap();

        assert!(matches!(storage.set_item("", "1"), Err(StorageError::EmptyKey)));
        assert!(matches!(storage.get_item(""), Err(StorageError::EmptyKey)));
        assert!(matches!(storage.remove_item(""), Err(StorageError::EmptyKey)));

        storage.set_item("k", "1").unwrap();
        storage.clear().unwrap();
        assert!(storage.keys().unwrap().is_empty());
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_filesystem_storage_creates_nested_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");
        let storage = FilesystemStorage::new(&nested).unwrap();
        assert!(storage.dir().is_dir());
    }
}
