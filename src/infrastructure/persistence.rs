use crate::domain::StorageResult;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// String key-value surface the session is persisted to.
///
/// `set_many` and `remove_many` apply all of their keys or none of them.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set_many(&mut self, entries: &[(&str, &str)]) -> StorageResult<()>;
    fn remove_many(&mut self, keys: &[&str]) -> StorageResult<()>;

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.set_many(&[(key, value)])
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.remove_many(&[key])
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> StorageResult<()> {
        for (key, value) in entries {
            self.entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove_many(&mut self, keys: &[&str]) -> StorageResult<()> {
        for key in keys {
            self.entries.remove(*key);
        }
        Ok(())
    }
}

/// A JSON object on disk, rewritten once per change. A failed write leaves
/// the in-memory view as it was before the change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is an empty store; an
    /// unreadable or malformed one is an error.
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "opened session file");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn commit(&mut self, previous: BTreeMap<String, String>) -> StorageResult<()> {
        if let Err(e) = self.flush() {
            tracing::warn!(path = %self.path.display(), error = %e, "session write failed");
            self.entries = previous;
            return Err(e);
        }
        Ok(())
    }

    fn flush(&self) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> StorageResult<()> {
        let previous = self.entries.clone();
        for (key, value) in entries {
            self.entries.insert(key.to_string(), value.to_string());
        }
        self.commit(previous)
    }

    fn remove_many(&mut self, keys: &[&str]) -> StorageResult<()> {
        let previous = self.entries.clone();
        let mut changed = false;
        for key in keys {
            changed |= self.entries.remove(*key).is_some();
        }
        if !changed {
            return Ok(());
        }
        self.commit(previous)
    }
}
