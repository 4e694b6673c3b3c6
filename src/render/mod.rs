//! Turning templates and user overrides into page changes
//!
//! Rendering is split in two halves:
//! - merge: a pure function from (template, profile, settings) to a [`RenderSpec`]
//! - apply: projects a `RenderSpec` onto located page targets as a mutation journal
//!
//! The DOM is never the source of truth. Re-rendering the same inputs yields
//! the same journal, and `backup` holds the single style snapshot needed to
//! take the customization back off the page.

pub mod apply;
pub mod backup;
pub mod merge;

pub use apply::{ORIGINAL_SRC_ATTR, OVERLAY_ID, apply, restore, set_overlay_visibility};
pub use backup::StyleBackup;
pub use merge::merge;

use crate::template::{Background, FontWeight, ProfilePicturePosition, ProfilePictureSize, TextPosition};
use serde::{Deserialize, Serialize};

/// Border width used when neither the user nor the template sets one
pub const DEFAULT_BORDER_WIDTH: u32 = 3;

/// Border color used when neither the user nor the template sets one
pub const DEFAULT_BORDER_COLOR: &str = "#ffffff";

/// Fully resolved text element, ready to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDirective {
    pub id: String,
    pub content: String,
    pub position: TextPosition,
    pub color: String,
    pub font_size: u32,
    pub font_weight: FontWeight,
    pub font_family: String,
}

impl TextDirective {
    /// Inline CSS for the overlay span
    pub fn css(&self) -> Vec<(&'static str, String)> {
        let mut props: Vec<(&'static str, String)> = vec![("position", "absolute".to_string())];
        props.extend(self.position.css().into_iter().map(|(k, v)| (k, v.to_string())));
        props.extend([
            ("color", self.color.clone()),
            ("font-size", format!("{}px", self.font_size)),
            ("font-weight", self.font_weight.css_value().to_string()),
            ("font-family", self.font_family.clone()),
            ("text-align", self.position.text_align().to_string()),
            ("white-space", "nowrap".to_string()),
        ]);
        props
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderDirective {
    pub color: String,
    pub width: u32,
}

impl BorderDirective {
    /// Value for the CSS `border` shorthand
    pub fn css(&self) -> String {
        format!("{}px solid {}", self.width, self.color)
    }
}

/// How the profile picture should look
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePictureDirective {
    pub show: bool,
    pub size: ProfilePictureSize,
    pub position: ProfilePicturePosition,
    /// `None` when the template draws no border
    pub border: Option<BorderDirective>,
    /// Image to display; `None` keeps whatever the page shows
    pub image: Option<String>,
}

/// Everything needed to draw a customized banner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSpec {
    pub template_id: String,
    pub background: Background,
    pub text_elements: Vec<TextDirective>,
    pub profile_picture: ProfilePictureDirective,
}

impl RenderSpec {
    pub fn text(&self, id: &str) -> Option<&TextDirective> {
        self.text_elements.iter().find(|t| t.id == id)
    }
}
