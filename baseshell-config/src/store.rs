//! Key-value persistence collaborator.
//!
//! The shell keeps small JSON values (`layout.horizontal`, `layout.vertical`
//! and unrelated settings) in a key-value store. Both operations are
//! asynchronous so callers never block the event thread on disk I/O.
//!
//! - [`JsonFileStore`]: one JSON object on disk, written atomically
//! - [`MemoryStore`]: in-process store with a write log and failure injection

use crate::error::ConfigError;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Asynchronous get/set access to JSON values by key.
pub trait KeyValueStore: Send + Sync + 'static {
    /// Fetch the value stored under `key`, `None` if absent.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Value>, ConfigError>> + Send;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Value) -> impl Future<Output = Result<(), ConfigError>> + Send;
}

/// Store backed by a single JSON object file.
///
/// Contents are cached in memory after [`JsonFileStore::open`]; every `set`
/// rewrites the whole file through a temp file and rename. Writes are
/// serialized so concurrent saves cannot interleave on the temp file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<Map<String, Value>>,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonFileStore {
    /// Open the store at `path`.
    ///
    /// A missing file is an empty store. A file that cannot be read or parsed
    /// is logged and also treated as empty; it is replaced on the next write.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match Self::read_entries(&path).await {
            Ok(Some(entries)) => {
                log::info!("Loaded {} store entries from {:?}", entries.len(), path);
                entries
            }
            Ok(None) => {
                log::info!("Store file {:?} not found, starting empty", path);
                Map::new()
            }
            Err(e) => {
                log::warn!("Store file {:?} is unreadable, starting empty: {}", path, e);
                Map::new()
            }
        };

        Self {
            path,
            entries: Mutex::new(entries),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    async fn read_entries(path: &Path) -> Result<Option<Map<String, Value>>, ConfigError> {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str::<Value>(&contents)? {
            Value::Object(map) => Ok(Some(map)),
            other => Err(ConfigError::validation(format!(
                "store root must be a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self) -> Result<(), ConfigError> {
        let _guard = self.write_lock.lock().await;

        let json = {
            let entries = self.entries.lock();
            serde_json::to_string_pretty(&*entries)?
        };

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, json).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;
        log::trace!("Store written to {:?}", self.path);
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Value>, ConfigError>> + Send {
        let value = self.entries.lock().get(key).cloned();
        async move { Ok(value) }
    }

    fn set(&self, key: &str, value: Value) -> impl Future<Output = Result<(), ConfigError>> + Send {
        self.entries.lock().insert(key.to_string(), value);
        self.flush()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// In-memory store.
///
/// Keeps an ordered log of every successful write so callers can observe how
/// often and with what payload a key was persisted. Reads and writes can be
/// made to fail to exercise recovery paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
    writes: Mutex<Vec<(String, Value)>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`.
    pub fn with_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let store = Self::new();
        store
            .entries
            .lock()
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v)));
        store
    }

    /// Make subsequent reads fail with an I/O error.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent writes fail with an I/O error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current value of `key` without going through the async API.
    pub fn peek(&self, key: &str) -> Option<Value> {
        self.entries.lock().get(key).cloned()
    }

    /// All successful writes in order.
    pub fn writes(&self) -> Vec<(String, Value)> {
        self.writes.lock().clone()
    }

    /// Number of successful writes to `key`.
    pub fn write_count(&self, key: &str) -> usize {
        self.writes.lock().iter().filter(|(k, _)| k == key).count()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Value>, ConfigError>> + Send {
        let result = if self.fail_reads.load(Ordering::SeqCst) {
            Err(ConfigError::Io(std::io::Error::other("simulated read failure")))
        } else {
            Ok(self.entries.lock().get(key).cloned())
        };
        async move { result }
    }

    fn set(&self, key: &str, value: Value) -> impl Future<Output = Result<(), ConfigError>> + Send {
        let result = if self.fail_writes.load(Ordering::SeqCst) {
            Err(ConfigError::Io(std::io::Error::other(
                "simulated write failure",
            )))
        } else {
            self.entries.lock().insert(key.to_string(), value.clone());
            self.writes.lock().push((key.to_string(), value));
            Ok(())
        };
        async move { result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_memory_store_get_set() {
        let store = MemoryStore::new();
        assert!(store.get("missing").await.unwrap().is_none());

        store.set("answer", json!(42)).await.unwrap();
        assert_eq!(store.get("answer").await.unwrap(), Some(json!(42)));
        assert_eq!(store.write_count("answer"), 1);
    }

    #[tokio::test]
    async fn test_memory_store_failure_injection() {
        let store = MemoryStore::with_entries([("k", json!("v"))]);

        store.set_fail_reads(true);
        assert!(store.get("k").await.is_err());
        store.set_fail_reads(false);
        assert_eq!(store.get("k").await.unwrap(), Some(json!("v")));

        store.set_fail_writes(true);
        assert!(store.set("k", json!("w")).await.is_err());
        assert_eq!(store.peek("k"), Some(json!("v")));
        assert!(store.writes().is_empty());
    }

    #[tokio::test]
    async fn test_json_file_store_persists_across_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("baseshell.config");

        let store = JsonFileStore::open(&path).await;
        assert!(store.get("layout.vertical").await.unwrap().is_none());
        store
            .set("layout.vertical", json!([30.0, 70.0]))
            .await
            .unwrap();
        assert!(path.exists());

        let reopened = JsonFileStore::open(&path).await;
        assert_eq!(
            reopened.get("layout.vertical").await.unwrap(),
            Some(json!([30.0, 70.0]))
        );
    }

    #[tokio::test]
    async fn test_json_file_store_keeps_unrelated_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("baseshell.config");
        std::fs::write(&path, r#"{"project_config": {"name": "demo"}}"#).unwrap();

        let store = JsonFileStore::open(&path).await;
        store.set("layout.horizontal", json!([20, 60, 20])).await.unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["project_config"]["name"], json!("demo"));
        assert_eq!(raw["layout.horizontal"], json!([20, 60, 20]));
    }

    #[tokio::test]
    async fn test_json_file_store_corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("baseshell.config");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::open(&path).await;
        assert!(store.get("layout.horizontal").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_json_file_store_non_object_root_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("baseshell.config");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let store = JsonFileStore::open(&path).await;
        assert!(store.get("0").await.unwrap().is_none());
    }
}
