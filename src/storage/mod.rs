//! Persistence of the active template, customization settings and uploaded images
//!
//! [`KeyValueStore`] is the raw JSON key-value seam (an in-memory map, a JSON
//! file, or anything else that can hold JSON values). [`Storage`] layers the
//! typed records on top of it under three fixed keys.

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::{CustomizerError, Result};
use crate::settings::{CustomizationSettings, ProfileImages};
use crate::template::DEFAULT_TEMPLATE_ID;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;

pub const ACTIVE_TEMPLATE_KEY: &str = "activeTemplate";
pub const CUSTOM_SETTINGS_KEY: &str = "customSettings";
pub const PROFILE_IMAGES_KEY: &str = "profileImages";

/// Asynchronous JSON key-value store
///
/// Each call is atomic on its own; there is no cross-call transaction.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Values for `keys`, or every stored value when `keys` is `None`.
    /// Missing keys are absent from the result.
    async fn get(&self, keys: Option<&[String]>) -> Result<Map<String, Value>>;

    /// Insert or replace the given entries
    async fn set(&self, items: Map<String, Value>) -> Result<()>;

    /// Remove every entry
    async fn clear(&self) -> Result<()>;
}

/// Typed access to the customizer's records
#[derive(Clone)]
pub struct Storage {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

impl Storage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Storage over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// The raw store underneath
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let keys = [key.to_string()];
        let mut values = self.store.get(Some(&keys[..])).await?;
        match values.remove(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| CustomizerError::StorageFailed(format!("Malformed '{}' record: {}", key, e))),
        }
    }

    async fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let mut items = Map::new();
        items.insert(key.to_string(), serde_json::to_value(value)?);
        self.store.set(items).await
    }

    /// Id of the selected template, `modern` when none is stored
    pub async fn active_template(&self) -> Result<String> {
        Ok(self
            .read::<String>(ACTIVE_TEMPLATE_KEY)
            .await?
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| DEFAULT_TEMPLATE_ID.to_string()))
    }

    pub async fn save_active_template(&self, template_id: &str) -> Result<()> {
        self.write(ACTIVE_TEMPLATE_KEY, &template_id).await
    }

    pub async fn custom_settings(&self) -> Result<Option<CustomizationSettings>> {
        self.read(CUSTOM_SETTINGS_KEY).await
    }

    pub async fn save_custom_settings(&self, settings: &CustomizationSettings) -> Result<()> {
        self.write(CUSTOM_SETTINGS_KEY, settings).await
    }

    pub async fn profile_images(&self) -> Result<ProfileImages> {
        Ok(self.read(PROFILE_IMAGES_KEY).await?.unwrap_or_default())
    }

    /// Merge `update` into the stored images; fields it leaves empty are kept
    pub async fn save_profile_images(&self, update: ProfileImages) -> Result<ProfileImages> {
        let merged = self.profile_images().await?.merged(update);
        self.write(PROFILE_IMAGES_KEY, &merged).await?;
        Ok(merged)
    }

    /// Forget both uploaded images
    pub async fn clear_profile_images(&self) -> Result<()> {
        self.write(PROFILE_IMAGES_KEY, &ProfileImages::default()).await
    }

    pub async fn clear_all(&self) -> Result<()> {
        self.store.clear().await
    }

    /// Install-time defaults: fill in the active template and empty settings if absent
    pub async fn ensure_defaults(&self) -> Result<()> {
        let keys = [ACTIVE_TEMPLATE_KEY.to_string(), CUSTOM_SETTINGS_KEY.to_string()];
        let existing = self.store.get(Some(&keys[..])).await?;

        let mut items = Map::new();
        if !existing.contains_key(ACTIVE_TEMPLATE_KEY) {
            items.insert(ACTIVE_TEMPLATE_KEY.to_string(), Value::from(DEFAULT_TEMPLATE_ID));
        }
        if !existing.contains_key(CUSTOM_SETTINGS_KEY) {
            items.insert(
                CUSTOM_SETTINGS_KEY.to_string(),
                serde_json::to_value(CustomizationSettings::default())?,
            );
        }

        if items.is_empty() {
            return Ok(());
        }
        log::info!("Installing default storage values: {:?}", items.keys().collect::<Vec<_>>());
        self.store.set(items).await
    }
}
