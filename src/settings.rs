//! User customization state persisted between sessions.

use crate::template::{DEFAULT_TEMPLATE_ID, FontWeight, TextPosition};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Partial override for a template text element. Unset fields fall back to the template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<TextPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

impl TextOverride {
    /// Layer `other` on top of `self`; fields set in `other` win
    pub fn merge(&mut self, other: TextOverride) {
        if other.content.is_some() {
            self.content = other.content;
        }
        if other.position.is_some() {
            self.position = other.position;
        }
        if other.color.is_some() {
            self.color = other.color;
        }
        if other.font_size.is_some() {
            self.font_size = other.font_size;
        }
        if other.font_weight.is_some() {
            self.font_weight = other.font_weight;
        }
        if other.font_family.is_some() {
            self.font_family = other.font_family;
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == TextOverride::default()
    }
}

/// Named color overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomColors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_border: Option<String>,
}

/// Overrides layered on top of the active template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizationSettings {
    pub active_template_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_profile_image: Option<String>,
    #[serde(default)]
    pub custom_text_elements: IndexMap<String, TextOverride>,
    #[serde(default)]
    pub custom_colors: CustomColors,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_border_width: Option<u32>,
}

impl Default for CustomizationSettings {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE_ID)
    }
}

impl CustomizationSettings {
    /// Empty settings for a template
    pub fn new(template_id: impl Into<String>) -> Self {
        Self {
            active_template_id: template_id.into(),
            custom_background_image: None,
            custom_profile_image: None,
            custom_text_elements: IndexMap::new(),
            custom_colors: CustomColors::default(),
            profile_border_width: None,
        }
    }

    /// Override text content of one element
    pub fn set_text_content(&mut self, element_id: &str, content: impl Into<String>) {
        self.custom_text_elements
            .entry(element_id.to_string())
            .or_default()
            .content = Some(content.into());
    }

    /// Merge a partial override for one element
    pub fn merge_text_override(&mut self, element_id: &str, patch: TextOverride) {
        self.custom_text_elements
            .entry(element_id.to_string())
            .or_default()
            .merge(patch);
    }

    /// A solid background color replaces any uploaded background image
    pub fn set_background_color(&mut self, color: impl Into<String>) {
        self.custom_colors.background = Some(color.into());
        self.custom_background_image = None;
    }

    /// An uploaded background image replaces any custom background color
    pub fn set_background_image(&mut self, data_url: impl Into<String>) {
        self.custom_background_image = Some(data_url.into());
        self.custom_colors.background = None;
    }

    pub fn set_profile_border_color(&mut self, color: impl Into<String>) {
        self.custom_colors.profile_border = Some(color.into());
    }

    /// Whether anything beyond the template choice is customized
    pub fn has_overrides(&self) -> bool {
        self.custom_background_image.is_some()
            || self.custom_profile_image.is_some()
            || self.custom_text_elements.values().any(|o| !o.is_empty())
            || self.custom_colors != CustomColors::default()
            || self.profile_border_width.is_some()
    }
}

/// Uploaded images, stored as data URLs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileImages {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_image: Option<String>,
}

impl ProfileImages {
    /// Non-empty fields in `update` replace stored ones; the rest are kept
    pub fn merged(mut self, update: ProfileImages) -> Self {
        if let Some(picture) = update.profile_picture.filter(|p| !p.is_empty()) {
            self.profile_picture = Some(picture);
        }
        if let Some(banner) = update.banner_image.filter(|b| !b.is_empty()) {
            self.banner_image = Some(banner);
        }
        self
    }
}
