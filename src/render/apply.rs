use crate::dom::{DomMutation, DomPatcher, DomTree, ElementNode, NodePath};
use crate::locator::Targets;
use crate::render::{RenderSpec, StyleBackup};

/// Id of the overlay container appended to the banner
pub const OVERLAY_ID: &str = "profile-customizer-banner";

/// Attribute keeping the page's own profile picture source
pub const ORIGINAL_SRC_ATTR: &str = "data-original-src";

const TEXT_CLASS: &str = "profile-customizer-text";

const BACKGROUND_PROPERTIES: [&str; 4] = [
    "background-image",
    "background-color",
    "background-size",
    "background-position",
];

const PICTURE_PROPERTIES: [&str; 3] = ["border", "border-radius", "opacity"];

/// Project a render spec onto the located targets.
///
/// Missing targets are skipped with a warning; this never fails. The returned
/// journal holds exactly the mutations that were applied to `tree`.
pub fn apply(tree: &mut DomTree, targets: &Targets, spec: &RenderSpec, backup: &mut StyleBackup) -> Vec<DomMutation> {
    if let Some(banner) = targets.banner_path() {
        backup.capture(tree, banner);
    }

    let mut patcher = DomPatcher::new(tree);

    match targets.banner_path() {
        Some(banner) if patcher.tree().node(banner).is_some() => apply_banner(&mut patcher, banner, spec, backup),
        _ => log::warn!("No banner target, skipping background and text"),
    }

    match targets.profile_picture_path() {
        Some(picture) if spec.profile_picture.show => apply_profile_picture(&mut patcher, picture, spec),
        Some(picture) => {
            log::debug!("Template '{}' hides the profile picture", spec.template_id);
            reset_profile_picture(&mut patcher, picture, &["border", "border-radius"]);
        }
        None => log::warn!("No profile picture target, skipping picture"),
    }

    patcher.finish()
}

fn apply_banner(patcher: &mut DomPatcher<'_>, banner: &NodePath, spec: &RenderSpec, backup: &StyleBackup) {
    let background = spec.background.css();

    // Drop background properties left over from a previous render
    for property in BACKGROUND_PROPERTIES {
        if background.iter().any(|(p, _)| *p == property) {
            continue;
        }
        match backup.style().and_then(|s| s.get(property)) {
            Some(original) => patcher.set_style(banner, property, original.clone()),
            None => patcher.remove_style(banner, property),
        };
    }
    for (property, value) in background {
        patcher.set_style(banner, property, value);
    }

    let positioned = patcher
        .tree()
        .node(banner)
        .and_then(|node| node.effective_style("position"))
        .is_some_and(|p| p == "relative" || p == "absolute");
    if !positioned {
        patcher.set_style(banner, "position", "relative");
    }

    let overlay = match patcher.tree().find_by_id(OVERLAY_ID) {
        Some(existing) if existing.starts_with(banner) => {
            patcher.clear_children(&existing);
            Some(existing)
        }
        _ => patcher.append_child(banner, overlay_node()),
    };

    let Some(overlay) = overlay else {
        log::warn!("Could not attach overlay to banner at {}", banner);
        return;
    };

    for text in &spec.text_elements {
        let mut node = ElementNode::new("span")
            .with_attribute("class", TEXT_CLASS)
            .with_attribute("data-element-id", text.id.clone())
            .with_text(text.content.clone())
            .with_visibility(true);
        for (property, value) in text.css() {
            node.set_style(property, value);
        }
        patcher.append_child(&overlay, node);
    }
}

fn overlay_node() -> ElementNode {
    ElementNode::new("div")
        .with_attribute("id", OVERLAY_ID)
        .with_visibility(true)
        .with_style("position", "absolute")
        .with_style("top", "0")
        .with_style("left", "0")
        .with_style("width", "100%")
        .with_style("height", "100%")
        .with_style("z-index", "5")
        .with_style("overflow", "hidden")
        .with_style("pointer-events", "none")
        .with_style("opacity", "0")
        .with_style("transition", "opacity 0.3s ease")
}

fn apply_profile_picture(patcher: &mut DomPatcher<'_>, picture: &NodePath, spec: &RenderSpec) {
    let Some(node) = patcher.tree().node(picture) else {
        log::warn!("Profile picture target {} is gone", picture);
        return;
    };
    let current_src = node.get_attribute("src").cloned();
    let has_original = node.get_attribute(ORIGINAL_SRC_ATTR).is_some();

    match &spec.profile_picture.image {
        Some(image) => {
            if !has_original {
                if let Some(src) = current_src {
                    patcher.set_attribute(picture, ORIGINAL_SRC_ATTR, src);
                }
            }
            patcher.set_attribute(picture, "src", image.clone());
        }
        None => reset_profile_picture(patcher, picture, &[]),
    }

    match &spec.profile_picture.border {
        Some(border) => {
            patcher.set_style(picture, "border", border.css());
            patcher.set_style(picture, "border-radius", "50%");
        }
        None => reset_profile_picture(patcher, picture, &["border", "border-radius"]),
    }
}

/// Put back the page's own picture source and drop the given inline styles
fn reset_profile_picture(patcher: &mut DomPatcher<'_>, picture: &NodePath, properties: &[&'static str]) {
    let Some(node) = patcher.tree().node(picture) else {
        return;
    };
    let original = node.get_attribute(ORIGINAL_SRC_ATTR).cloned();
    let set: Vec<&str> = properties
        .iter()
        .copied()
        .filter(|property| node.inline_style(property).is_some())
        .collect();

    if let Some(original) = original {
        patcher.set_attribute(picture, "src", original);
        patcher.remove_attribute(picture, ORIGINAL_SRC_ATTR);
    }
    for property in set {
        patcher.remove_style(picture, property);
    }
}

/// Show or hide the customization without re-rendering
pub fn set_overlay_visibility(tree: &mut DomTree, targets: &Targets, visible: bool) -> Vec<DomMutation> {
    let overlay = tree.find_by_id(OVERLAY_ID);
    let mut patcher = DomPatcher::new(tree);

    if let Some(overlay) = overlay {
        patcher.set_style(&overlay, "opacity", if visible { "1" } else { "0" });
    }
    if let Some(picture) = targets.profile_picture_path() {
        patcher.set_style(picture, "opacity", if visible { "1" } else { "0.5" });
    }

    patcher.finish()
}

/// Take the customization back off the page
pub fn restore(tree: &mut DomTree, targets: &Targets, backup: &mut StyleBackup) -> Vec<DomMutation> {
    let overlay = tree.find_by_id(OVERLAY_ID);
    let mut patcher = DomPatcher::new(tree);

    if let Some(picture) = targets.profile_picture_path() {
        reset_profile_picture(&mut patcher, picture, &PICTURE_PROPERTIES);
    }

    if let Some((path, original)) = backup.take() {
        let current: Vec<String> = patcher
            .tree()
            .node(&path)
            .map(|node| node.style.keys().cloned().collect())
            .unwrap_or_default();
        for property in current.iter().filter(|p| !original.contains_key(p.as_str())) {
            patcher.remove_style(&path, property);
        }
        for (property, value) in &original {
            patcher.set_style(&path, property, value.clone());
        }
    }

    // The overlay is the banner's last child, so removing it leaves other paths intact
    if let Some(overlay) = overlay {
        patcher.remove_node(&overlay);
    }

    patcher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::{LocateStrategy, LocatedElement};
    use crate::profile::ProfileData;
    use crate::render::merge;
    use crate::settings::CustomizationSettings;
    use crate::template::TemplateCatalog;

    fn page() -> DomTree {
        DomTree::new(ElementNode::new("html").with_children(vec![ElementNode::new("body").with_children(vec![
            ElementNode::new("div")
                .with_attribute("class", "profile-background-image")
                .with_style("height", "200px")
                .with_computed_style("position", "static"),
            ElementNode::new("img")
                .with_attribute("class", "pv-top-card-profile-picture__image")
                .with_attribute("src", "https://cdn.example.com/ada.jpg"),
        ])]))
    }

    fn targets() -> Targets {
        let located = |path: Vec<usize>| LocatedElement {
            path: NodePath::from(path),
            strategy: LocateStrategy::Background,
        };
        Targets {
            banner: Some(located(vec![0, 0])),
            profile_picture: Some(located(vec![0, 1])),
        }
    }

    fn spec(settings: &CustomizationSettings) -> RenderSpec {
        let catalog = TemplateCatalog::builtin();
        merge(
            catalog.get_or_default(&settings.active_template_id),
            &ProfileData::default(),
            settings,
        )
    }

    #[test]
    fn test_apply_writes_background_overlay_and_picture() {
        let mut tree = page();
        let mut settings = CustomizationSettings::new("professional");
        settings.custom_profile_image = Some("data:image/jpeg;base64,AAAA".to_string());
        let mut backup = StyleBackup::new();

        let journal = apply(&mut tree, &targets(), &spec(&settings), &mut backup);
        assert!(!journal.is_empty());

        let banner = tree.node(&NodePath::from(vec![0, 0])).unwrap();
        assert_eq!(banner.inline_style("background-color"), Some("#0A66C2"));
        assert_eq!(banner.inline_style("position"), Some("relative"));
        let overlay = &banner.children[0];
        assert_eq!(overlay.id().map(String::as_str), Some(OVERLAY_ID));
        assert_eq!(overlay.children.len(), 3);

        let picture = tree.node(&NodePath::from(vec![0, 1])).unwrap();
        assert_eq!(picture.get_attribute("src").unwrap(), "data:image/jpeg;base64,AAAA");
        assert_eq!(
            picture.get_attribute(ORIGINAL_SRC_ATTR).unwrap(),
            "https://cdn.example.com/ada.jpg"
        );
        assert_eq!(picture.inline_style("border"), Some("3px solid #ffffff"));
        assert_eq!(picture.inline_style("border-radius"), Some("50%"));
    }

    #[test]
    fn test_rerender_reuses_overlay() {
        let mut tree = page();
        let mut backup = StyleBackup::new();
        let settings = CustomizationSettings::new("modern");

        apply(&mut tree, &targets(), &spec(&settings), &mut backup);
        let mut settings = settings;
        settings.set_background_color("#112233");
        apply(&mut tree, &targets(), &spec(&settings), &mut backup);

        let banner = tree.node(&NodePath::from(vec![0, 0])).unwrap();
        assert_eq!(banner.children.len(), 1);
        assert_eq!(banner.children[0].children.len(), 2);
        assert_eq!(banner.inline_style("background-color"), Some("#112233"));
        assert_eq!(banner.inline_style("background-image"), Some("none"));
    }

    #[test]
    fn test_missing_targets_is_noop() {
        let mut tree = page();
        let before = tree.clone();
        let journal = apply(
            &mut tree,
            &Targets::default(),
            &spec(&CustomizationSettings::default()),
            &mut StyleBackup::new(),
        );

        assert!(journal.is_empty());
        assert_eq!(tree, before);
    }

    #[test]
    fn test_visibility() {
        let mut tree = page();
        apply(
            &mut tree,
            &targets(),
            &spec(&CustomizationSettings::default()),
            &mut StyleBackup::new(),
        );

        set_overlay_visibility(&mut tree, &targets(), true);
        let overlay = tree.find_by_id(OVERLAY_ID).unwrap();
        assert_eq!(tree.node(&overlay).unwrap().inline_style("opacity"), Some("1"));

        set_overlay_visibility(&mut tree, &targets(), false);
        assert_eq!(tree.node(&overlay).unwrap().inline_style("opacity"), Some("0"));
        let picture = tree.node(&NodePath::from(vec![0, 1])).unwrap();
        assert_eq!(picture.inline_style("opacity"), Some("0.5"));
    }

    #[test]
    fn test_hidden_picture_drops_earlier_render() {
        let mut rendered_twice = page();
        let mut backup = StyleBackup::new();
        let mut settings = CustomizationSettings::new("professional");
        settings.custom_profile_image = Some("data:image/jpeg;base64,AAAA".to_string());
        apply(&mut rendered_twice, &targets(), &spec(&settings), &mut backup);
        settings.active_template_id = "minimal".to_string();
        apply(&mut rendered_twice, &targets(), &spec(&settings), &mut backup);

        let mut rendered_once = page();
        apply(&mut rendered_once, &targets(), &spec(&settings), &mut StyleBackup::new());

        assert_eq!(rendered_twice, rendered_once);
        let picture = rendered_twice.node(&NodePath::from(vec![0, 1])).unwrap();
        assert_eq!(picture.inline_style("border"), None);
        assert_eq!(picture.get_attribute("src").unwrap(), "https://cdn.example.com/ada.jpg");
        assert!(picture.get_attribute(ORIGINAL_SRC_ATTR).is_none());
    }

    #[test]
    fn test_restore_returns_to_original() {
        let original = page();
        let mut tree = page();
        let mut backup = StyleBackup::new();
        let mut settings = CustomizationSettings::new("professional");
        settings.custom_profile_image = Some("data:image/jpeg;base64,AAAA".to_string());

        apply(&mut tree, &targets(), &spec(&settings), &mut backup);
        set_overlay_visibility(&mut tree, &targets(), true);
        restore(&mut tree, &targets(), &mut backup);

        assert_eq!(tree, original);
    }
}
