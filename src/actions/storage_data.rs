use crate::actions::{Action, ActionContext, ActionResult};
use crate::error::Result;
use crate::storage::{ACTIVE_TEMPLATE_KEY, CUSTOM_SETTINGS_KEY, PROFILE_IMAGES_KEY};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parameters for the getStorageData action
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GetStorageDataParams {
    /// Keys to read; omit or pass null to read everything
    #[serde(default)]
    pub keys: Option<Vec<String>>,
}

/// Read raw values from the key-value store
#[derive(Default)]
pub struct GetStorageDataAction;

#[async_trait::async_trait]
impl Action for GetStorageDataAction {
    type Params = GetStorageDataParams;

    fn name(&self) -> &str {
        "getStorageData"
    }

    async fn execute_typed(
        &self,
        params: GetStorageDataParams,
        context: &mut ActionContext<'_>,
    ) -> Result<ActionResult> {
        let values = context.session.storage().store().get(params.keys.as_deref()).await?;
        Ok(ActionResult::success_with(Value::Object(values)))
    }
}

/// Parameters for the setStorageData action
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SetStorageDataParams {
    /// Entries to insert or replace
    pub data: Map<String, Value>,
}

/// Write raw values to the key-value store
#[derive(Default)]
pub struct SetStorageDataAction;

#[async_trait::async_trait]
impl Action for SetStorageDataAction {
    type Params = SetStorageDataParams;

    fn name(&self) -> &str {
        "setStorageData"
    }

    async fn execute_typed(
        &self,
        params: SetStorageDataParams,
        context: &mut ActionContext<'_>,
    ) -> Result<ActionResult> {
        let touches_settings = [ACTIVE_TEMPLATE_KEY, CUSTOM_SETTINGS_KEY, PROFILE_IMAGES_KEY]
            .iter()
            .any(|key| params.data.contains_key(*key));

        context.session.storage().store().set(params.data).await?;

        // Keep an initialized page in step with what was just written
        if touches_settings && context.session.is_initialized() {
            context.session.load_settings().await?;
            context.session.render();
        }
        Ok(ActionResult::success())
    }
}
