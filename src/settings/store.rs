//! Key-value stores backing [`Settings`](super::Settings).

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::composer::common::error::{ComposeError, Result};

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<&Value>;
    fn set(&mut self, key: &str, value: Value);
    /// Persists pending changes.
    fn flush(&mut self) -> Result<()>;
}

/// In-memory store; `flush` is a no-op.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: Map<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Store persisted as a single JSON object on disk.
///
/// The file is read once on open and rewritten in full on `flush` when
/// something changed. A missing file is an empty store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Map<String, Value>,
    dirty: bool,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let values = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| ComposeError::Settings(format!("{}: {}", path.display(), e)))?;
            if content.trim().is_empty() {
                Map::new()
            } else {
                match serde_json::from_str::<Value>(&content) {
                    Ok(Value::Object(map)) => map,
                    Ok(_) => {
                        return Err(ComposeError::Settings(format!(
                            "{}: expected a JSON object",
                            path.display()
                        )));
                    }
                    Err(e) => {
                        return Err(ComposeError::Settings(format!("{}: {}", path.display(), e)));
                    }
                }
            }
        } else {
            Map::new()
        };

        debug!(path = %path.display(), keys = values.len(), "Settings loaded");
        Ok(Self { path, values, dirty: false })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    fn set(&mut self, key: &str, value: Value) {
        if self.values.get(key) != Some(&value) {
            self.values.insert(key.to_string(), value);
            self.dirty = true;
        }
    }

    fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| ComposeError::Settings(format!("{}: {}", parent.display(), e)))?;
        }

        let content = serde_json::to_string_pretty(&self.values)
            .map_err(|e| ComposeError::Settings(e.to_string()))?;
        std::fs::write(&self.path, content)
            .map_err(|e| ComposeError::Settings(format!("{}: {}", self.path.display(), e)))?;

        debug!(path = %self.path.display(), "Settings saved");
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("settings.json")).unwrap();
        assert!(store.get("anything").is_none());
    }

    #[test]
    fn values_survive_flush_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.set("outputFormat", json!("tif"));
        store.flush().unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("outputFormat"), Some(&json!("tif")));
    }

    #[test]
    fn unchanged_store_does_not_touch_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.flush().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_file_is_a_settings_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(JsonFileStore::open(&path), Err(ComposeError::Settings(_))));

        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(JsonFileStore::open(&path), Err(ComposeError::Settings(_))));
    }

    #[test]
    fn memory_store_round_trips_values() {
        let mut store = MemoryStore::new();
        store.set("k", json!(3));
        assert_eq!(store.get("k"), Some(&json!(3)));
        store.flush().unwrap();
    }
}
