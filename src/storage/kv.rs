//! Key-value backends holding the serialized report collection.

use std::{
    collections::HashMap,
    io::{self, Write},
    path::{Path, PathBuf},
};

/// Persistent string storage addressed by key.
pub trait KeyValueStore {
    /// Reads the value stored under `key`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the value exists but cannot be read.
    fn get(&self, key: &str) -> io::Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// Stores each key as `<key>.json` inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created on first
    /// write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    #[must_use]
    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        // write beside the target, then rename over it
        let mut file = tempfile::NamedTempFile::new_in(&self.dir)?;
        file.write_all(value.as_bytes())?;
        file.persist(self.path(key)).map_err(|e| e.error)?;
        tracing::debug!("Wrote {}", self.path(key).display());
        Ok(())
    }
}

/// In-memory storage, used in tests and benchmarks.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates a store holding a single value.
    #[must_use]
    pub fn with(key: &str, value: impl Into<String>) -> Self {
        let mut values = HashMap::new();
        values.insert(key.to_string(), value.into());
        Self { values }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Memory storage whose next writes fail.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FailingStore {
    pub(crate) inner: MemoryStore,
    pub(crate) failures: usize,
}

#[cfg(test)]
impl FailingStore {
    pub(crate) fn new(inner: MemoryStore, failures: usize) -> Self {
        Self { inner, failures }
    }
}

#[cfg(test)]
impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(io::Error::other("disk full"));
        }
        self.inner.set(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_missing_key_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path().join("data"));

        assert_eq!(store.get("absent").unwrap(), None);
    }

    #[test]
    fn file_store_overwrites_value() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(tmp.path().join("data"));

        store.set("db", "[1]").unwrap();
        store.set("db", "[2]").unwrap();

        assert_eq!(store.get("db").unwrap().as_deref(), Some("[2]"));
        assert!(store.path("db").ends_with("db.json"));
        assert_eq!(std::fs::read_dir(store.dir()).unwrap().count(), 1);
    }

    #[test]
    fn memory_store_round_trips() {
        let mut store = MemoryStore::default();
        assert_eq!(store.get("db").unwrap(), None);

        store.set("db", "[]").unwrap();
        assert_eq!(store.get("db").unwrap().as_deref(), Some("[]"));
    }
}
