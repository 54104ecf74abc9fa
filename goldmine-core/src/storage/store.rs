//! Backing stores for serialized saves.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::{validate_key, StorageError};

/// String-keyed storage for serialized save blobs, last write wins.
pub trait KeyValueStore {
    /// Read the blob stored under `key`, if any.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the blob stored under `key`.
    fn write(&self, key: &str, data: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, data: &str) -> Result<(), StorageError> {
        (**self).write(key, data)
    }
}

/// In-memory store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a raw blob into the store.
    pub fn insert(&self, key: &str, data: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), data.to_string());
    }

    /// Raw blob under `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get(key))
    }

    fn write(&self, key: &str, data: &str) -> Result<(), StorageError> {
        self.insert(key, data);
        Ok(())
    }
}

/// Directory-backed store with one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Use `dir` for save files. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory holding the save files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn write(&self, key: &str, data: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_err)?;
        // Write then rename so a crash never leaves a half-written save.
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, data).map_err(io_err)?;
        fs::rename(&staging, &path).map_err(io_err)?;
        Ok(())
    }
}
