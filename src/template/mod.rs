//! Banner templates
//!
//! - model: Template, TextElement, Background and their enums
//! - catalog: the immutable set of built-in presets

pub mod catalog;
pub mod model;

pub use catalog::{DEFAULT_TEMPLATE_ID, TemplateCatalog};
pub use model::{
    Background, BackgroundKind, FontWeight, HorizontalAlign, ProfilePicturePosition, ProfilePictureSize, Template,
    TextElement, TextPosition, TextRole, VerticalAlign,
};

/// Inline CSS declarations that place an element at a grid cell,
/// e.g. `left: 16px; bottom: 16px`
pub fn position_css(position: TextPosition) -> String {
    position
        .css()
        .into_iter()
        .map(|(prop, value)| format!("{}: {}", prop, value))
        .collect::<Vec<_>>()
        .join("; ")
}
