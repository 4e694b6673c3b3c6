use crate::error::{CustomizerError, Result};
use crate::storage::KeyValueStore;
use serde_json::{Map, Value};
use std::sync::Mutex;

/// Process-local store, used by tests and one-shot CLI runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<Map<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `entries`
    pub fn with_entries(entries: Map<String, Value>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Map<String, Value>>> {
        self.entries
            .lock()
            .map_err(|_| CustomizerError::StorageFailed("memory store lock poisoned".to_string()))
    }
}

/// Pick `keys` out of `entries`, or everything when `keys` is `None`
pub(crate) fn select(entries: &Map<String, Value>, keys: Option<&[String]>) -> Map<String, Value> {
    match keys {
        None => entries.clone(),
        Some(keys) => keys
            .iter()
            .filter_map(|k| entries.get(k).map(|v| (k.clone(), v.clone())))
            .collect(),
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, keys: Option<&[String]>) -> Result<Map<String, Value>> {
        Ok(select(&*self.lock()?, keys))
    }

    async fn set(&self, items: Map<String, Value>) -> Result<()> {
        self.lock()?.extend(items);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.lock()?.clear();
        Ok(())
    }
}
