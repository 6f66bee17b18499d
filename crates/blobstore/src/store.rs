//! JSON blob store trait and implementations.
//!
//! Keys are expected to be pre-sanitized by callers (alphanumeric plus
//! `._-`). The filesystem implementation still rejects keys that could
//! escape the root directory, so a missed sanitisation cannot turn into a
//! path traversal.

use crate::{BlobStoreError, BlobStoreResult};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// Read/write access to one JSON value per string key.
///
/// `get` on a key that has never been written returns `Ok(None)`; `put`
/// overwrites the whole value. There is no locking across callers: two
/// concurrent read-modify-write cycles race and the last writer wins.
pub trait JsonStore: Send + Sync {
    /// Returns the stored value for `key`, or `None` if the key has never
    /// been written.
    fn get(&self, key: &str) -> BlobStoreResult<Option<Value>>;

    /// Overwrites the stored value for `key`.
    fn put(&self, key: &str, value: &Value) -> BlobStoreResult<()>;
}

/// Filesystem-backed store: one `<key>.json` file per key under `root`.
///
/// The root directory is created on first write, so a store pointed at a
/// directory that does not exist yet reads as empty rather than erroring.
#[derive(Debug)]
pub struct FsJsonStore {
    root: PathBuf,
}

impl FsJsonStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn value_path(&self, key: &str) -> BlobStoreResult<PathBuf> {
        if key.is_empty() || !key.bytes().all(is_safe_key_byte) {
            return Err(BlobStoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

fn is_safe_key_byte(b: u8) -> bool {
    matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'.' | b'_' | b'-')
}

impl JsonStore for FsJsonStore {
    fn get(&self, key: &str) -> BlobStoreResult<Option<Value>> {
        let path = self.value_path(key)?;
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(BlobStoreError::Read(e)),
        };
        let value = serde_json::from_str(&contents).map_err(BlobStoreError::Decode)?;
        Ok(Some(value))
    }

    fn put(&self, key: &str, value: &Value) -> BlobStoreResult<()> {
        let path = self.value_path(key)?;
        fs::create_dir_all(&self.root).map_err(BlobStoreError::StorageDirCreation)?;
        let contents = serde_json::to_string(value).map_err(BlobStoreError::Encode)?;
        fs::write(&path, contents).map_err(BlobStoreError::Write)?;
        tracing::debug!("stored blob under key {key}");
        Ok(())
    }
}

/// In-memory store for tests.
#[derive(Debug, Default)]
pub struct MemoryJsonStore {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryJsonStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JsonStore for MemoryJsonStore {
    fn get(&self, key: &str) -> BlobStoreResult<Option<Value>> {
        let values = match self.values.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Ok(values.get(key).cloned())
    }

    fn put(&self, key: &str, value: &Value) -> BlobStoreResult<()> {
        let mut values = match self.values.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        values.insert(key.to_string(), value.clone());
        Ok(())
    }
}
