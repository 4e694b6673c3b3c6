use crate::profile::ProfileData;
use crate::render::{
    BorderDirective, DEFAULT_BORDER_COLOR, DEFAULT_BORDER_WIDTH, ProfilePictureDirective, RenderSpec, TextDirective,
};
use crate::settings::{CustomizationSettings, TextOverride};
use crate::template::{Background, Template, TextElement, TextRole};

/// Resolve what should be drawn from a template, scraped profile facts and user overrides.
///
/// Pure: the same inputs always produce the same spec. Values are passed
/// through without CSS validation.
pub fn merge(template: &Template, profile: &ProfileData, settings: &CustomizationSettings) -> RenderSpec {
    RenderSpec {
        template_id: template.id.clone(),
        background: merge_background(template, settings),
        text_elements: template
            .text_elements
            .iter()
            .map(|element| merge_text(element, profile, settings.custom_text_elements.get(&element.id)))
            .collect(),
        profile_picture: merge_profile_picture(template, profile, settings),
    }
}

fn merge_background(template: &Template, settings: &CustomizationSettings) -> Background {
    if let Some(image) = non_empty(settings.custom_background_image.as_deref()) {
        return Background::image(image);
    }
    if let Some(color) = non_empty(settings.custom_colors.background.as_deref()) {
        return Background::color(color);
    }
    template.background.clone()
}

fn merge_text(element: &TextElement, profile: &ProfileData, over: Option<&TextOverride>) -> TextDirective {
    let profile_value = match element.role() {
        Some(TextRole::Title) => non_empty(Some(&profile.name)),
        Some(TextRole::Slogan) => non_empty(Some(&profile.title)),
        _ => None,
    };

    let content = over
        .and_then(|o| non_empty(o.content.as_deref()))
        .or(profile_value)
        .unwrap_or(&element.content)
        .to_string();

    TextDirective {
        id: element.id.clone(),
        content,
        position: over.and_then(|o| o.position).unwrap_or(element.position),
        color: over
            .and_then(|o| o.color.clone())
            .unwrap_or_else(|| element.color.clone()),
        font_size: over.and_then(|o| o.font_size).unwrap_or(element.font_size),
        font_weight: over.and_then(|o| o.font_weight).unwrap_or(element.font_weight),
        font_family: over
            .and_then(|o| o.font_family.clone())
            .unwrap_or_else(|| element.font_family.clone()),
    }
}

fn merge_profile_picture(
    template: &Template,
    profile: &ProfileData,
    settings: &CustomizationSettings,
) -> ProfilePictureDirective {
    let border = template.profile_picture_border.then(|| BorderDirective {
        color: non_empty(settings.custom_colors.profile_border.as_deref())
            .or(template.profile_picture_border_color.as_deref())
            .unwrap_or(DEFAULT_BORDER_COLOR)
            .to_string(),
        width: settings
            .profile_border_width
            .or(template.profile_picture_border_width)
            .unwrap_or(DEFAULT_BORDER_WIDTH),
    });

    let image = non_empty(settings.custom_profile_image.as_deref())
        .or_else(|| non_empty(Some(&profile.profile_picture_url)))
        .map(str::to_string);

    ProfilePictureDirective {
        show: template.show_profile_picture,
        size: template.profile_picture_size,
        position: template.profile_picture_position,
        border,
        image,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
