use serde::{Deserialize, Serialize};

/// Nine-way placement of a text element inside the banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextPosition {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// Horizontal third of a grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

/// Vertical third of a grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
}

impl TextPosition {
    pub const ALL: [TextPosition; 9] = [
        TextPosition::TopLeft,
        TextPosition::TopCenter,
        TextPosition::TopRight,
        TextPosition::CenterLeft,
        TextPosition::Center,
        TextPosition::CenterRight,
        TextPosition::BottomLeft,
        TextPosition::BottomCenter,
        TextPosition::BottomRight,
    ];

    pub fn horizontal(self) -> HorizontalAlign {
        match self {
            TextPosition::TopLeft | TextPosition::CenterLeft | TextPosition::BottomLeft => HorizontalAlign::Left,
            TextPosition::TopCenter | TextPosition::Center | TextPosition::BottomCenter => HorizontalAlign::Center,
            TextPosition::TopRight | TextPosition::CenterRight | TextPosition::BottomRight => HorizontalAlign::Right,
        }
    }

    pub fn vertical(self) -> VerticalAlign {
        match self {
            TextPosition::TopLeft | TextPosition::TopCenter | TextPosition::TopRight => VerticalAlign::Top,
            TextPosition::CenterLeft | TextPosition::Center | TextPosition::CenterRight => VerticalAlign::Middle,
            TextPosition::BottomLeft | TextPosition::BottomCenter | TextPosition::BottomRight => VerticalAlign::Bottom,
        }
    }

    /// Absolute-positioning CSS that places an element at this grid cell
    pub fn css(self) -> Vec<(&'static str, &'static str)> {
        let mut props = Vec::with_capacity(3);
        let (mut tx, mut ty) = ("0", "0");

        match self.horizontal() {
            HorizontalAlign::Left => props.push(("left", "16px")),
            HorizontalAlign::Right => props.push(("right", "16px")),
            HorizontalAlign::Center => {
                props.push(("left", "50%"));
                tx = "-50%";
            }
        }

        match self.vertical() {
            VerticalAlign::Top => props.push(("top", "16px")),
            VerticalAlign::Bottom => props.push(("bottom", "16px")),
            VerticalAlign::Middle => {
                props.push(("top", "50%"));
                ty = "-50%";
            }
        }

        let transform = match (tx, ty) {
            ("0", "0") => None,
            ("-50%", "0") => Some("translateX(-50%)"),
            ("0", "-50%") => Some("translateY(-50%)"),
            _ => Some("translate(-50%, -50%)"),
        };
        if let Some(transform) = transform {
            props.push(("transform", transform));
        }

        props
    }

    /// CSS `text-align` for the horizontal third
    pub fn text_align(self) -> &'static str {
        match self.horizontal() {
            HorizontalAlign::Left => "left",
            HorizontalAlign::Center => "center",
            HorizontalAlign::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Bold,
    Light,
}

impl FontWeight {
    /// Value for the CSS `font-weight` property
    pub fn css_value(self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
            FontWeight::Light => "300",
        }
    }
}

/// What a text element stands for when filled from profile data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Title,
    Slogan,
    CallToAction,
}

/// A positioned piece of text in a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub id: String,
    pub content: String,
    pub position: TextPosition,
    pub color: String,
    /// Size in CSS pixels
    pub font_size: u32,
    pub font_weight: FontWeight,
    pub font_family: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_title: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_slogan: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_call_to_action: bool,
}

impl TextElement {
    /// The element's role; title wins over slogan, slogan over call-to-action
    pub fn role(&self) -> Option<TextRole> {
        if self.is_title {
            Some(TextRole::Title)
        } else if self.is_slogan {
            Some(TextRole::Slogan)
        } else if self.is_call_to_action {
            Some(TextRole::CallToAction)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    Color,
    Gradient,
    Image,
}

/// Banner background: a color, a CSS gradient, or an image URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Background {
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    pub value: String,
}

impl Background {
    pub fn color(value: impl Into<String>) -> Self {
        Self {
            kind: BackgroundKind::Color,
            value: value.into(),
        }
    }

    pub fn gradient(value: impl Into<String>) -> Self {
        Self {
            kind: BackgroundKind::Gradient,
            value: value.into(),
        }
    }

    pub fn image(value: impl Into<String>) -> Self {
        Self {
            kind: BackgroundKind::Image,
            value: value.into(),
        }
    }

    /// Inline CSS properties that paint this background
    pub fn css(&self) -> Vec<(&'static str, String)> {
        match self.kind {
            BackgroundKind::Image => vec![
                ("background-image", format!("url({})", self.value)),
                ("background-size", "cover".to_string()),
                ("background-position", "center".to_string()),
            ],
            BackgroundKind::Color => vec![
                ("background-image", "none".to_string()),
                ("background-color", self.value.clone()),
            ],
            BackgroundKind::Gradient => vec![("background-image", self.value.clone())],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfilePictureSize {
    Small,
    Medium,
    Large,
}

impl ProfilePictureSize {
    /// Diameter of the preview avatar in CSS pixels
    pub fn diameter(self) -> u32 {
        match self {
            ProfilePictureSize::Small => 40,
            ProfilePictureSize::Medium => 60,
            ProfilePictureSize::Large => 80,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfilePicturePosition {
    Left,
    Center,
    Right,
}

/// A named banner preset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub thumbnail: String,
    pub background: Background,
    pub text_elements: Vec<TextElement>,
    pub show_profile_picture: bool,
    pub profile_picture_size: ProfilePictureSize,
    pub profile_picture_position: ProfilePicturePosition,
    pub profile_picture_border: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_border_width: Option<u32>,
}

impl Template {
    /// Look up a text element by id
    pub fn text_element(&self, id: &str) -> Option<&TextElement> {
        self.text_elements.iter().find(|el| el.id == id)
    }
}
