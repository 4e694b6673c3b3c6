use crate::error::{CustomizerError, Result};
use crate::storage::KeyValueStore;
use crate::storage::memory::select;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Store backed by a single JSON object on disk
///
/// The whole file is rewritten on every `set`. A missing file reads as empty.
///
/// Reads and writes use blocking `std::fs` calls inside the async methods and
/// hold a mutex for the duration, so every call blocks the executor thread it
/// runs on. Wrap calls in `tokio::task::spawn_blocking` where that matters.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(self.failed("read", e)),
        };
        if contents.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&contents).map_err(|e| self.failed("parse", e))? {
            Value::Object(map) => Ok(map),
            _ => Err(CustomizerError::StorageFailed(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
        }
    }

    fn save(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.failed("create directory for", e))?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, json).map_err(|e| self.failed("write", e))
    }

    fn failed(&self, what: &str, err: impl std::fmt::Display) -> CustomizerError {
        CustomizerError::StorageFailed(format!("Failed to {} {}: {}", what, self.path.display(), err))
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| CustomizerError::StorageFailed("file store lock poisoned".to_string()))
    }
}

#[async_trait::async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, keys: Option<&[String]>) -> Result<Map<String, Value>> {
        let _guard = self.guard()?;
        Ok(select(&self.load()?, keys))
    }

    async fn set(&self, items: Map<String, Value>) -> Result<()> {
        let _guard = self.guard()?;
        let mut entries = self.load()?;
        entries.extend(items);
        self.save(&entries)
    }

    async fn clear(&self) -> Result<()> {
        let _guard = self.guard()?;
        self.save(&Map::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("profile-customizer-{}-{}.json", name, std::process::id()))
    }

    #[tokio::test]
    async fn test_persists_across_instances() {
        let path = temp_path("persist");
        let _ = std::fs::remove_file(&path);

        let mut items = Map::new();
        items.insert("activeTemplate".to_string(), json!("creative"));
        JsonFileStore::new(&path).set(items).await.unwrap();

        let reopened = JsonFileStore::new(&path);
        let values = reopened.get(None).await.unwrap();
        assert_eq!(values["activeTemplate"], json!("creative"));

        reopened.clear().await.unwrap();
        assert!(reopened.get(None).await.unwrap().is_empty());
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let store = JsonFileStore::new(temp_path("missing-never-written"));
        assert!(store.get(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_object_file() {
        let path = temp_path("array");
        std::fs::write(&path, "[1, 2]").unwrap();

        let err = JsonFileStore::new(&path).get(None).await.unwrap_err();
        assert!(matches!(err, CustomizerError::StorageFailed(_)));
        let _ = std::fs::remove_file(&path);
    }
}
