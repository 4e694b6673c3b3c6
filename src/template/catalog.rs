use crate::error::{CustomizerError, Result};
use crate::template::model::{
    Background, FontWeight, ProfilePicturePosition, ProfilePictureSize, Template, TextElement, TextPosition,
};

/// Id of the template used when nothing else is selected
pub const DEFAULT_TEMPLATE_ID: &str = "modern";

/// Immutable set of templates
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateCatalog {
    /// Build a catalog from explicit templates. The first one is the default.
    pub fn new(templates: Vec<Template>) -> Result<Self> {
        if templates.is_empty() {
            return Err(CustomizerError::Config("template catalog is empty".to_string()));
        }
        Ok(Self { templates })
    }

    /// Parse a catalog from a JSON array of templates
    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(serde_json::from_str(json)?)
    }

    /// The templates shipped with the crate
    pub fn builtin() -> Self {
        Self {
            templates: vec![modern(), professional(), minimal(), corporate(), creative()],
        }
    }

    pub fn all(&self) -> &[Template] {
        &self.templates
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Like `get`, but unknown ids are an error
    pub fn require(&self, id: &str) -> Result<&Template> {
        self.get(id).ok_or_else(|| CustomizerError::UnknownTemplate(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn default_template(&self) -> &Template {
        self.get(DEFAULT_TEMPLATE_ID).unwrap_or(&self.templates[0])
    }

    /// `get`, falling back to the default template for unknown ids
    pub fn get_or_default(&self, id: &str) -> &Template {
        self.get(id).unwrap_or_else(|| {
            log::warn!("Unknown template '{}', using '{}'", id, self.default_template().id);
            self.default_template()
        })
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(|t| t.id.as_str())
    }
}

fn text(
    id: &str,
    content: &str,
    position: TextPosition,
    color: &str,
    font_size: u32,
    font_weight: FontWeight,
    font_family: &str,
) -> TextElement {
    TextElement {
        id: id.to_string(),
        content: content.to_string(),
        position,
        color: color.to_string(),
        font_size,
        font_weight,
        font_family: font_family.to_string(),
        is_title: id == "title",
        is_slogan: id == "slogan",
        is_call_to_action: id == "cta",
    }
}

fn modern() -> Template {
    let font = "Inter, sans-serif";
    Template {
        id: "modern".to_string(),
        name: "Modern Gradient".to_string(),
        thumbnail: "assets/thumbnails/modern.png".to_string(),
        background: Background::gradient("linear-gradient(135deg, #6366f1, #a855f7)"),
        text_elements: vec![
            text("title", "Your Name", TextPosition::BottomLeft, "#ffffff", 24, FontWeight::Bold, font),
            text(
                "slogan",
                "Your professional slogan here",
                TextPosition::BottomLeft,
                "#e0e0e0",
                16,
                FontWeight::Normal,
                font,
            ),
        ],
        show_profile_picture: true,
        profile_picture_size: ProfilePictureSize::Large,
        profile_picture_position: ProfilePicturePosition::Right,
        profile_picture_border: true,
        profile_picture_border_color: Some("#ffffff".to_string()),
        profile_picture_border_width: Some(4),
    }
}

fn professional() -> Template {
    let font = "Arial, sans-serif";
    Template {
        id: "professional".to_string(),
        name: "Professional Blue".to_string(),
        thumbnail: "assets/thumbnails/professional.png".to_string(),
        background: Background::color("#0A66C2"),
        text_elements: vec![
            text("title", "Your Name", TextPosition::Center, "#ffffff", 28, FontWeight::Bold, font),
            text(
                "slogan",
                "Your professional title",
                TextPosition::Center,
                "#e0e0e0",
                18,
                FontWeight::Normal,
                font,
            ),
            text("cta", "Connect with me", TextPosition::BottomRight, "#ffffff", 14, FontWeight::Bold, font),
        ],
        show_profile_picture: true,
        profile_picture_size: ProfilePictureSize::Medium,
        profile_picture_position: ProfilePicturePosition::Left,
        profile_picture_border: true,
        profile_picture_border_color: Some("#ffffff".to_string()),
        profile_picture_border_width: Some(3),
    }
}

fn minimal() -> Template {
    let font = "Helvetica, sans-serif";
    Template {
        id: "minimal".to_string(),
        name: "Minimal White".to_string(),
        thumbnail: "assets/thumbnails/minimal.png".to_string(),
        background: Background::color("#ffffff"),
        text_elements: vec![
            text("title", "Your Name", TextPosition::CenterLeft, "#000000", 24, FontWeight::Light, font),
            text(
                "slogan",
                "Professional | Creative | Innovative",
                TextPosition::CenterLeft,
                "#666666",
                16,
                FontWeight::Light,
                font,
            ),
        ],
        show_profile_picture: false,
        profile_picture_size: ProfilePictureSize::Small,
        profile_picture_position: ProfilePicturePosition::Center,
        profile_picture_border: false,
        profile_picture_border_color: None,
        profile_picture_border_width: None,
    }
}

fn corporate() -> Template {
    let font = "Roboto, sans-serif";
    Template {
        id: "corporate".to_string(),
        name: "Corporate Pattern".to_string(),
        thumbnail: "assets/thumbnails/corporate.png".to_string(),
        background: Background::image("assets/backgrounds/corporate-pattern.png"),
        text_elements: vec![
            text("title", "Your Name", TextPosition::BottomLeft, "#ffffff", 26, FontWeight::Bold, font),
            text(
                "slogan",
                "Your Title at Company",
                TextPosition::BottomLeft,
                "#e0e0e0",
                18,
                FontWeight::Normal,
                font,
            ),
        ],
        show_profile_picture: true,
        profile_picture_size: ProfilePictureSize::Medium,
        profile_picture_position: ProfilePicturePosition::Right,
        profile_picture_border: true,
        profile_picture_border_color: Some("#ffffff".to_string()),
        profile_picture_border_width: Some(3),
    }
}

fn creative() -> Template {
    let font = "Montserrat, sans-serif";
    Template {
        id: "creative".to_string(),
        name: "Creative Colorful".to_string(),
        thumbnail: "assets/thumbnails/creative.png".to_string(),
        background: Background::gradient("linear-gradient(90deg, #FF9A8B 0%, #FF6A88 55%, #FF99AC 100%)"),
        text_elements: vec![
            text("title", "Your Name", TextPosition::CenterRight, "#ffffff", 30, FontWeight::Bold, font),
            text(
                "slogan",
                "Creative Professional",
                TextPosition::CenterRight,
                "#ffffff",
                18,
                FontWeight::Normal,
                font,
            ),
        ],
        show_profile_picture: true,
        profile_picture_size: ProfilePictureSize::Large,
        profile_picture_position: ProfilePicturePosition::Left,
        profile_picture_border: false,
        profile_picture_border_color: None,
        profile_picture_border_width: None,
    }
}
