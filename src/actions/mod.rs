//! Named actions driven by JSON messages
//!
//! Each action declares typed, schema-described parameters and runs against a
//! [`PageSession`]. Messages arrive as `{"action": "<name>", ...params}` and
//! are answered with `{"success": bool, "data"?: ..., "error"?: "..."}`.

pub mod lifecycle;
pub mod storage_data;

pub use lifecycle::{ActivateAction, CheckStatusAction, DeactivateAction, InitializeAction, TogglePanelAction};
pub use storage_data::{GetStorageDataAction, GetStorageDataParams, SetStorageDataAction, SetStorageDataParams};

use crate::error::{CustomizerError, Result};
use crate::session::PageSession;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// State an action runs against
pub struct ActionContext<'a> {
    pub session: &'a mut PageSession,
}

impl<'a> ActionContext<'a> {
    pub fn new(session: &'a mut PageSession) -> Self {
        Self { session }
    }
}

/// Response to a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResult {
    pub fn success() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    pub fn success_with(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Parameters for actions that take none
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct NoParams {}

/// An action with typed parameters
#[async_trait::async_trait]
pub trait Action: Send + Sync {
    type Params: DeserializeOwned + JsonSchema + Send;

    /// Message name that selects this action
    fn name(&self) -> &str;

    async fn execute_typed(&self, params: Self::Params, context: &mut ActionContext<'_>) -> Result<ActionResult>;

    /// JSON schema of the parameters
    fn parameters_schema(&self) -> Value {
        schemars::schema_for!(Self::Params).to_value()
    }
}

/// Object-safe view of an [`Action`], taking untyped JSON parameters
#[async_trait::async_trait]
pub trait DynAction: Send + Sync {
    fn name(&self) -> &str;

    fn parameters_schema(&self) -> Value;

    async fn execute(&self, params: Value, context: &mut ActionContext<'_>) -> Result<ActionResult>;
}

#[async_trait::async_trait]
impl<T: Action> DynAction for T {
    fn name(&self) -> &str {
        Action::name(self)
    }

    fn parameters_schema(&self) -> Value {
        Action::parameters_schema(self)
    }

    async fn execute(&self, params: Value, context: &mut ActionContext<'_>) -> Result<ActionResult> {
        let params = if params.is_null() { Value::Object(Default::default()) } else { params };
        let typed: T::Params = serde_json::from_value(params).map_err(|e| CustomizerError::InvalidParams {
            action: Action::name(self).to_string(),
            reason: e.to_string(),
        })?;
        self.execute_typed(typed, context).await
    }
}

/// Actions by name, in registration order
pub struct ActionRegistry {
    actions: IndexMap<String, Box<dyn DynAction>>,
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ActionRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            actions: IndexMap::new(),
        }
    }

    /// Registry with every built-in action
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(InitializeAction);
        registry.register(ActivateAction);
        registry.register(DeactivateAction);
        registry.register(TogglePanelAction);
        registry.register(CheckStatusAction);
        registry.register(GetStorageDataAction);
        registry.register(SetStorageDataAction);
        registry
    }

    /// Add an action, replacing any with the same name
    pub fn register<A: Action + 'static>(&mut self, action: A) {
        let name = Action::name(&action).to_string();
        self.actions.insert(name, Box::new(action));
    }

    pub fn get(&self, name: &str) -> Option<&dyn DynAction> {
        self.actions.get(name).map(|a| a.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    /// Parameter schema of every action, keyed by name
    pub fn schemas(&self) -> serde_json::Map<String, Value> {
        self.actions
            .iter()
            .map(|(name, action)| (name.clone(), action.parameters_schema()))
            .collect()
    }

    /// Run an action by name
    pub async fn execute(&self, name: &str, params: Value, context: &mut ActionContext<'_>) -> Result<ActionResult> {
        let action = self
            .get(name)
            .ok_or_else(|| CustomizerError::UnknownAction(name.to_string()))?;
        log::debug!("Executing action '{}'", name);
        action.execute(params, context).await
    }

    /// Answer a raw `{"action": name, ...params}` message. Errors become failure responses.
    pub async fn dispatch(&self, message: Value, context: &mut ActionContext<'_>) -> ActionResult {
        let Value::Object(mut fields) = message else {
            return ActionResult::failure("message must be a JSON object");
        };
        let name = match fields.remove("action") {
            Some(Value::String(name)) => name,
            _ => return ActionResult::failure("message has no 'action' field"),
        };

        match self.execute(&name, Value::Object(fields), context).await {
            Ok(result) => result,
            Err(e) => {
                log::warn!("Action '{}' failed: {}", name, e);
                ActionResult::failure(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CustomizerOptions;
    use crate::dom::{DomTree, ElementNode};
    use crate::storage::Storage;
    use serde_json::json;

    fn session() -> PageSession {
        let tree = DomTree::new(ElementNode::new("html").with_children(vec![ElementNode::new("body").with_children(
            vec![ElementNode::new("div").with_attribute("class", "profile-background-image")],
        )]));
        PageSession::create(
            "https://www.linkedin.com/in/ada",
            tree,
            Storage::in_memory(),
            CustomizerOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_registry_defaults() {
        let registry = ActionRegistry::with_defaults();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(
            names,
            vec![
                "initialize",
                "activate",
                "deactivate",
                "togglePanel",
                "checkStatus",
                "getStorageData",
                "setStorageData"
            ]
        );
        assert!(registry.schemas().values().all(Value::is_object));
    }

    #[tokio::test]
    async fn test_dispatch_unknown_action() {
        let registry = ActionRegistry::with_defaults();
        let mut session = session();
        let mut context = ActionContext::new(&mut session);

        let result = registry.dispatch(json!({ "action": "selfDestruct" }), &mut context).await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Unknown action: selfDestruct"));
    }

    #[tokio::test]
    async fn test_dispatch_malformed_message() {
        let registry = ActionRegistry::with_defaults();
        let mut session = session();
        let mut context = ActionContext::new(&mut session);

        assert!(!registry.dispatch(json!([1, 2]), &mut context).await.success);
        assert!(!registry.dispatch(json!({ "keys": [] }), &mut context).await.success);
    }

    #[test]
    fn test_result_wire_format() {
        let json = serde_json::to_value(ActionResult::success()).unwrap();
        assert_eq!(json, json!({ "success": true }));

        let json = serde_json::to_value(ActionResult::failure("nope")).unwrap();
        assert_eq!(json, json!({ "success": false, "error": "nope" }));
    }
}
