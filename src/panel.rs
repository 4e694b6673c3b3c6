//! Visibility state of the customizer side panel.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelState {
    #[default]
    Hidden,
    Collapsed,
    Expanded,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelTab {
    #[default]
    Banner,
    Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEvent {
    Toggle,
    Show,
    Hide,
    ToggleCollapse,
    SelectTab(PanelTab),
    Deactivate,
    Navigated,
}

/// Emitted when the panel appears or disappears
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VisibilityChange {
    pub visible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Panel {
    state: PanelState,
    tab: PanelTab,
}

impl Panel {
    /// A hidden panel on the banner tab
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn tab(&self) -> PanelTab {
        self.tab
    }

    pub fn is_visible(&self) -> bool {
        self.state != PanelState::Hidden
    }

    /// Apply an event, reporting a visibility change if one happened
    pub fn handle(&mut self, event: PanelEvent) -> Option<VisibilityChange> {
        let was_visible = self.is_visible();

        self.state = match (event, self.state) {
            (PanelEvent::Toggle, PanelState::Hidden) | (PanelEvent::Show, _) => PanelState::Expanded,
            (PanelEvent::Toggle, _) | (PanelEvent::Hide, _) | (PanelEvent::Deactivate, _) => PanelState::Hidden,
            (PanelEvent::Navigated, _) => {
                self.tab = PanelTab::Banner;
                PanelState::Hidden
            }
            (PanelEvent::ToggleCollapse, PanelState::Expanded) => PanelState::Collapsed,
            (PanelEvent::ToggleCollapse, PanelState::Collapsed) => PanelState::Expanded,
            (PanelEvent::ToggleCollapse, PanelState::Hidden) => PanelState::Hidden,
            (PanelEvent::SelectTab(tab), state) => {
                self.tab = tab;
                match state {
                    PanelState::Collapsed => PanelState::Expanded,
                    other => other,
                }
            }
        };

        let visible = self.is_visible();
        (visible != was_visible).then_some(VisibilityChange { visible })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut panel = Panel::new();
        assert_eq!(panel.handle(PanelEvent::Toggle), Some(VisibilityChange { visible: true }));
        assert_eq!(panel.state(), PanelState::Expanded);
        assert_eq!(panel.handle(PanelEvent::Toggle), Some(VisibilityChange { visible: false }));
        assert_eq!(panel.state(), PanelState::Hidden);
    }

    #[test]
    fn test_show_always_expands() {
        let mut panel = Panel::new();
        panel.handle(PanelEvent::Show);
        panel.handle(PanelEvent::ToggleCollapse);
        assert_eq!(panel.state(), PanelState::Collapsed);

        assert_eq!(panel.handle(PanelEvent::Show), None);
        assert_eq!(panel.state(), PanelState::Expanded);
    }

    #[test]
    fn test_collapse_ignored_when_hidden() {
        let mut panel = Panel::new();
        assert_eq!(panel.handle(PanelEvent::ToggleCollapse), None);
        assert_eq!(panel.state(), PanelState::Hidden);
    }

    #[test]
    fn test_select_tab_expands_collapsed() {
        let mut panel = Panel::new();
        panel.handle(PanelEvent::Show);
        panel.handle(PanelEvent::ToggleCollapse);
        panel.handle(PanelEvent::SelectTab(PanelTab::Profile));

        assert_eq!(panel.state(), PanelState::Expanded);
        assert_eq!(panel.tab(), PanelTab::Profile);

        // Selecting a tab does not reveal a hidden panel
        let mut hidden = Panel::new();
        assert_eq!(hidden.handle(PanelEvent::SelectTab(PanelTab::Profile)), None);
        assert_eq!(hidden.state(), PanelState::Hidden);
    }

    #[test]
    fn test_navigation_resets() {
        let mut panel = Panel::new();
        panel.handle(PanelEvent::Show);
        panel.handle(PanelEvent::SelectTab(PanelTab::Profile));

        assert_eq!(panel.handle(PanelEvent::Navigated), Some(VisibilityChange { visible: false }));
        assert_eq!(panel, Panel::new());
    }

    #[test]
    fn test_deactivate_and_hide() {
        let mut panel = Panel::new();
        assert_eq!(panel.handle(PanelEvent::Hide), None);
        panel.handle(PanelEvent::Show);
        assert_eq!(panel.handle(PanelEvent::Deactivate), Some(VisibilityChange { visible: false }));
    }
}
