//! Atomic TOML file operations.
//!
//! Every write goes to a sibling temp file, is synced, then renamed over the
//! target while an exclusive lock file is held, so readers only ever see a
//! complete old or complete new document.

use mentor_core::error::{MentorError, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// A handle to a TOML document on disk.
#[derive(Debug, Clone)]
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the document.
    ///
    /// A missing or blank file yields `Ok(None)`.
    pub fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: T = toml::from_str(&content)?;
        Ok(Some(data))
    }

    /// Loads the document, writing `default_value` first if it is missing.
    pub fn load_or_create(&self, default_value: T) -> Result<T> {
        let _lock = FileLock::acquire(&self.path)?;
        match self.load()? {
            Some(data) => Ok(data),
            None => {
                self.write_atomically(&default_value)?;
                Ok(default_value)
            }
        }
    }

    /// Replaces the document under the exclusive lock.
    pub fn save(&self, data: &T) -> Result<()> {
        let _lock = FileLock::acquire(&self.path)?;
        self.write_atomically(data)
    }

    fn write_atomically(&self, data: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let toml_string = toml::to_string_pretty(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| MentorError::io(format!("{} has no parent directory", self.path.display())))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| MentorError::io(format!("{} has no file name", self.path.display())))?;

        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

/// Exclusive lock on `<path>.lock`, released on drop.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        use fs2::FileExt;

        let lock_path = path.with_extension("lock");
        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        file.lock_exclusive()
            .map_err(|e| MentorError::io(format!("Failed to lock {}: {}", lock_path.display(), e)))?;

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // The lock itself is released with the handle.
        let _ = fs::remove_file(&self.lock_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        name: String,
        count: u32,
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Counter>::new(temp_dir.path().join("counter.toml"));

        let counter = Counter {
            name: "visits".to_string(),
            count: 42,
        };
        file.save(&counter).unwrap();

        assert_eq!(file.load().unwrap(), Some(counter));
    }

    #[test]
    fn test_load_missing_or_blank() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blank.toml");
        let file = AtomicTomlFile::<Counter>::new(path.clone());
        assert!(file.load().unwrap().is_none());

        fs::write(&path, "  \n").unwrap();
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_load_malformed_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.toml");
        fs::write(&path, "name = ").unwrap();

        let err = AtomicTomlFile::<Counter>::new(path).load().unwrap_err();
        assert!(matches!(err, MentorError::Serialization { ref format, .. } if format == "TOML"));
    }

    #[test]
    fn test_load_or_create_writes_default_once() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Counter>::new(temp_dir.path().join("nested/counter.toml"));
        let default = Counter {
            name: "default".to_string(),
            count: 0,
        };

        assert_eq!(file.load_or_create(default.clone()).unwrap(), default);
        assert!(file.path().exists());

        file.save(&Counter {
            name: "saved".to_string(),
            count: 7,
        })
        .unwrap();
        assert_eq!(file.load_or_create(default).unwrap().count, 7);
    }

    #[test]
    fn test_save_replaces_whole_table() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<BTreeMap<String, String>>::new(temp_dir.path().join("prefs.toml"));

        let mut table = BTreeMap::new();
        table.insert("username".to_string(), "alice".to_string());
        table.insert("theme".to_string(), "dark".to_string());
        file.save(&table).unwrap();

        table.remove("theme");
        file.save(&table).unwrap();

        let loaded = file.load().unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded["username"], "alice");
    }

    #[test]
    fn test_no_temp_or_lock_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter.toml");
        let file = AtomicTomlFile::<Counter>::new(path.clone());

        file.save(&Counter {
            name: "x".to_string(),
            count: 1,
        })
        .unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join(".counter.toml.tmp").exists());
        assert!(!temp_dir.path().join("counter.lock").exists());
    }
}
