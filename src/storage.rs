//!
//! goalblog storage module
//! ------------------------
//! Durable client-side key/value storage behind a small injectable trait, so
//! the session layer never touches a concrete store directly. Two backends
//! are provided: an in-memory map for tests and short-lived tools, and a
//! JSON-file store for the console binary. Multi-key mutations go through
//! `apply`, which commits the whole batch under one lock so related keys
//! (token/user/expiry) are never observed partially written.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value as JsonValue;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encode: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One mutation in an atomic batch.
#[derive(Debug, Clone)]
pub enum StorageOp {
    Set(String, String),
    Remove(String),
}

impl StorageOp {
    pub fn set(key: &str, value: impl Into<String>) -> Self { StorageOp::Set(key.to_string(), value.into()) }
    pub fn remove(key: &str) -> Self { StorageOp::Remove(key.to_string()) }
}

/// Injectable storage capability. String values only; callers that need
/// structured data serialize to JSON themselves.
pub trait StorageBackend: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    /// Apply every op in order under a single lock. Either the whole batch
    /// is visible to the next reader or none of it is.
    fn apply(&self, ops: &[StorageOp]) -> Result<(), StorageError>;
}

pub type SharedBackend = Arc<dyn StorageBackend>;

/// In-memory backend. Used by tests and anywhere persistence is unwanted.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    map: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.map.read().len() }
    pub fn is_empty(&self) -> bool { self.map.read().is_empty() }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.map.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.map.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.map.write().remove(key);
        Ok(())
    }

    fn apply(&self, ops: &[StorageOp]) -> Result<(), StorageError> {
        let mut w = self.map.write();
        for op in ops {
            match op {
                StorageOp::Set(k, v) => { w.insert(k.clone(), v.clone()); }
                StorageOp::Remove(k) => { w.remove(k); }
            }
        }
        Ok(())
    }
}

/// JSON-file backend: the whole map lives in one `state.json` under the
/// given directory. Writes go to a temp file first and are renamed into
/// place, so a crash mid-write leaves the previous image intact.
#[derive(Clone)]
pub struct FileBackend {
    path: PathBuf,
    map: Arc<RwLock<HashMap<String, String>>>,
}

impl FileBackend {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        let path = dir.join("state.json");
        let mut map: HashMap<String, String> = HashMap::new();
        if let Ok(bytes) = std::fs::read(&path) {
            // A corrupt image is treated as empty rather than an error so a
            // damaged state file never locks the user out.
            if let Ok(JsonValue::Object(obj)) = serde_json::from_slice::<JsonValue>(&bytes) {
                for (k, v) in obj {
                    if let JsonValue::String(s) = v { map.insert(k, s); }
                }
            }
        }
        Ok(Self { path, map: Arc::new(RwLock::new(map)) })
    }

    fn persist(&self, map: &HashMap<String, String>) -> Result<(), StorageError> {
        let obj: serde_json::Map<String, JsonValue> = map.iter()
            .map(|(k, v)| (k.clone(), JsonValue::String(v.clone())))
            .collect();
        let bytes = serde_json::to_vec_pretty(&JsonValue::Object(obj))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(tmp, &self.path)?;
        Ok(())
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.map.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.apply(&[StorageOp::set(key, value)])
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.apply(&[StorageOp::remove(key)])
    }

    fn apply(&self, ops: &[StorageOp]) -> Result<(), StorageError> {
        let mut w = self.map.write();
        for op in ops {
            match op {
                StorageOp::Set(k, v) => { w.insert(k.clone(), v.clone()); }
                StorageOp::Remove(k) => { w.remove(k); }
            }
        }
        self.persist(&w)
    }
}
