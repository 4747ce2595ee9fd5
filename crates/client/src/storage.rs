//! Durable single-slot storage for the session.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::SessionError;

/// String slots addressed by key, surviving process restarts.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// `None` when the slot is empty. Bytes that are not UTF-8 come back
    /// lossily decoded so the caller sees them as an unreadable value.
    async fn read(&self, key: &str) -> Result<Option<String>, SessionError>;

    async fn write(&self, key: &str, value: &str) -> Result<(), SessionError>;

    /// Removing an empty slot succeeds
    async fn remove(&self, key: &str) -> Result<(), SessionError>;
}

/// One `<key>.json` file per slot inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl SessionStorage for FileStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, SessionError> {
        match tokio::fs::read(self.path(key)).await {
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), SessionError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.path(key), value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SessionError> {
        match tokio::fs::remove_file(self.path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local slots, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SessionStorage for MemoryStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.slots().get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.slots().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SessionError> {
        self.slots().remove(key);
        Ok(())
    }
}
