use crate::dom::{DomTree, NodePath, Selector};
use serde::{Deserialize, Serialize};

const NAME_SELECTORS: &[&str] = &[".text-heading-xlarge", "h1.text-heading-xlarge", "h1.break-words"];

const TITLE_SELECTORS: &[&str] = &[
    ".text-body-medium.break-words",
    ".pv-text-details__left-panel .text-body-medium",
    ".text-body-medium.mt2",
];

const LOCATION_SELECTORS: &[&str] = &[
    ".text-body-small.inline.t-black--light.break-words",
    ".pv-text-details__left-panel .text-body-small",
];

const COMPANY_SELECTORS: &[&str] = &[
    ".inline-show-more-text",
    ".pv-text-details__right-panel .inline-show-more-text",
];

const PROFILE_PICTURE_SELECTORS: &[&str] = &[".pv-top-card-profile-picture__image"];

const BANNER_IMAGE_SELECTORS: &[&str] = &[
    ".profile-background-image .artdeco-carousel__item.active .profile-background-image__carousel-image",
    ".profile-topcard-background-image-edit img",
];

/// Read-only facts scraped from the host profile page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    pub name: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub profile_picture_url: String,
    pub banner_image_url: String,
}

impl ProfileData {
    /// Scrape profile facts from a page snapshot. Missing fields are empty.
    pub fn scrape(tree: &DomTree) -> Self {
        let data = Self {
            name: first_text(tree, NAME_SELECTORS),
            title: first_text(tree, TITLE_SELECTORS),
            company: first_text(tree, COMPANY_SELECTORS),
            location: first_text(tree, LOCATION_SELECTORS),
            profile_picture_url: first_attribute(tree, PROFILE_PICTURE_SELECTORS, "src"),
            banner_image_url: first_attribute(tree, BANNER_IMAGE_SELECTORS, "src"),
        };

        if data.name.is_empty() {
            log::debug!("No profile name found on page");
        }
        data
    }
}

fn first_match(tree: &DomTree, selectors: &[&str]) -> Option<NodePath> {
    selectors.iter().find_map(|css| match Selector::parse(css) {
        Ok(selector) => tree.query_selector(&selector),
        Err(e) => {
            log::warn!("{}", e);
            None
        }
    })
}

fn first_text(tree: &DomTree, selectors: &[&str]) -> String {
    first_match(tree, selectors)
        .and_then(|path| tree.node(&path).map(|node| node.text()))
        .unwrap_or_default()
}

fn first_attribute(tree: &DomTree, selectors: &[&str], attribute: &str) -> String {
    first_match(tree, selectors)
        .and_then(|path| tree.node(&path).and_then(|node| node.get_attribute(attribute).cloned()))
        .unwrap_or_default()
}
