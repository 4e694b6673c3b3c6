use crate::actions::{Action, ActionContext, ActionResult, NoParams};
use crate::error::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Set the session up if it is not already
#[derive(Default)]
pub struct InitializeAction;

#[async_trait::async_trait]
impl Action for InitializeAction {
    type Params = NoParams;

    fn name(&self) -> &str {
        "initialize"
    }

    async fn execute_typed(&self, _params: NoParams, context: &mut ActionContext<'_>) -> Result<ActionResult> {
        let initialized = context.session.initialize().await;
        Ok(ActionResult::success_with(serde_json::json!({ "initialized": initialized })))
    }
}

/// Show the panel and the customization
#[derive(Default)]
pub struct ActivateAction;

#[async_trait::async_trait]
impl Action for ActivateAction {
    type Params = NoParams;

    fn name(&self) -> &str {
        "activate"
    }

    async fn execute_typed(&self, _params: NoParams, context: &mut ActionContext<'_>) -> Result<ActionResult> {
        context.session.activate().await;
        Ok(ActionResult::success())
    }
}

/// Hide the panel and the customization
#[derive(Default)]
pub struct DeactivateAction;

#[async_trait::async_trait]
impl Action for DeactivateAction {
    type Params = NoParams;

    fn name(&self) -> &str {
        "deactivate"
    }

    async fn execute_typed(&self, _params: NoParams, context: &mut ActionContext<'_>) -> Result<ActionResult> {
        context.session.deactivate();
        Ok(ActionResult::success())
    }
}

/// Parameters for the togglePanel action
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TogglePanelParams {
    /// Force the panel shown (`true`) or hidden (`false`); omit to toggle
    #[serde(default)]
    pub visible: Option<bool>,
}

/// Activate on first use, then flip the panel
#[derive(Default)]
pub struct TogglePanelAction;

#[async_trait::async_trait]
impl Action for TogglePanelAction {
    type Params = TogglePanelParams;

    fn name(&self) -> &str {
        "togglePanel"
    }

    async fn execute_typed(
        &self,
        params: TogglePanelParams,
        context: &mut ActionContext<'_>,
    ) -> Result<ActionResult> {
        let visible = match params.visible {
            Some(visible) => {
                context.session.set_panel_visibility(visible).await;
                context.session.panel().is_visible()
            }
            None => context.session.toggle_panel().await,
        };
        Ok(ActionResult::success_with(serde_json::json!({ "visible": visible })))
    }
}

/// Report session flags
#[derive(Default)]
pub struct CheckStatusAction;

#[async_trait::async_trait]
impl Action for CheckStatusAction {
    type Params = NoParams;

    fn name(&self) -> &str {
        "checkStatus"
    }

    async fn execute_typed(&self, _params: NoParams, context: &mut ActionContext<'_>) -> Result<ActionResult> {
        Ok(ActionResult::success_with(serde_json::to_value(context.session.status())?))
    }
}
