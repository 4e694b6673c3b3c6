//! Finding the banner and profile picture in a page snapshot
//!
//! The banner search runs three stages and stops at the first hit:
//! 1. known selectors, in configured order
//! 2. large elements painting a non-default background (hinted ones first)
//! 3. the largest large element near the top of the page
//!
//! Stages 2 and 3 are pure functions over [`Candidate`] lists so they can be
//! exercised without a snapshot. All of this is coupled to the host page's
//! current markup and degrades to "not found" when it changes.

pub mod retry;

pub use retry::{RetryPolicy, locate_with_retry};

use crate::config::LocatorOptions;
use crate::dom::{BoundingBox, DomTree, NodePath, Selector};
use crate::error::Result;
use serde::Serialize;
use std::collections::HashSet;

/// How an element was found
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "selector", rename_all = "camelCase")]
pub enum LocateStrategy {
    KnownSelector(String),
    Background,
    TopOfPage,
}

/// An element picked by the locator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocatedElement {
    pub path: NodePath,
    pub strategy: LocateStrategy,
}

/// Everything the applier writes to
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Targets {
    pub banner: Option<LocatedElement>,
    pub profile_picture: Option<LocatedElement>,
}

impl Targets {
    pub fn banner_path(&self) -> Option<&NodePath> {
        self.banner.as_ref().map(|b| &b.path)
    }

    pub fn profile_picture_path(&self) -> Option<&NodePath> {
        self.profile_picture.as_ref().map(|p| &p.path)
    }

    /// Human-readable status line
    pub fn status(&self) -> String {
        match (&self.banner, &self.profile_picture) {
            (Some(b), Some(p)) => format!("Banner found at {}, profile picture at {}", b.path, p.path),
            (Some(b), None) => format!("Banner found at {}, profile picture not found", b.path),
            (None, Some(p)) => format!("Banner not found, profile picture at {}", p.path),
            (None, None) => "Banner not found".to_string(),
        }
    }
}

/// Geometry and paint facts about one element, as seen by the heuristics
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub path: NodePath,
    pub tag_name: String,
    pub bounding_box: Option<BoundingBox>,
    pub has_background: bool,
    pub hinted: bool,
}

impl Candidate {
    fn is_document_root(&self) -> bool {
        self.tag_name.eq_ignore_ascii_case("html") || self.tag_name.eq_ignore_ascii_case("body")
    }

    fn is_large(&self, min_width: f64, min_height: f64) -> bool {
        self.bounding_box.is_some_and(|b| b.exceeds(min_width, min_height))
    }
}

/// First large element with a non-default background, preferring hinted ones
pub fn select_by_background(candidates: &[Candidate], min_width: f64, min_height: f64) -> Option<&Candidate> {
    let qualifies = |c: &&Candidate| !c.is_document_root() && c.has_background && c.is_large(min_width, min_height);

    candidates
        .iter()
        .filter(|c| c.hinted)
        .find(qualifies)
        .or_else(|| candidates.iter().find(qualifies))
}

/// Largest element starting within `top_region` of the viewport, excluding html/body
pub fn select_top_largest(
    candidates: &[Candidate],
    min_width: f64,
    min_height: f64,
    top_region: f64,
) -> Option<&Candidate> {
    candidates
        .iter()
        .filter(|c| !c.is_document_root() && c.is_large(min_width, min_height))
        .filter(|c| c.bounding_box.is_some_and(|b| b.top() < top_region))
        // max_by keeps the last maximum; iterate in reverse so ties go to document order
        .rev()
        .max_by(|a, b| {
            let area = |c: &Candidate| c.bounding_box.map_or(0.0, |b| b.area());
            area(a).total_cmp(&area(b))
        })
}

/// Locates page targets with configured selectors and thresholds
#[derive(Debug, Clone)]
pub struct ElementLocator {
    banner_selectors: Vec<Selector>,
    hint_selectors: Vec<Selector>,
    profile_picture_selectors: Vec<Selector>,
    min_width: f64,
    min_height: f64,
    top_region: f64,
}

impl Default for ElementLocator {
    fn default() -> Self {
        // The built-in selectors are known to parse
        Self::new(&LocatorOptions::default()).unwrap_or_else(|_| Self {
            banner_selectors: Vec::new(),
            hint_selectors: Vec::new(),
            profile_picture_selectors: Vec::new(),
            min_width: 500.0,
            min_height: 100.0,
            top_region: 200.0,
        })
    }
}

impl ElementLocator {
    /// Build a locator, parsing every configured selector up front
    pub fn new(options: &LocatorOptions) -> Result<Self> {
        let parse_all = |list: &[String]| -> Result<Vec<Selector>> { list.iter().map(|s| Selector::parse(s)).collect() };

        Ok(Self {
            banner_selectors: parse_all(&options.banner_selectors)?,
            hint_selectors: parse_all(&options.banner_hint_selectors)?,
            profile_picture_selectors: parse_all(&options.profile_picture_selectors)?,
            min_width: options.min_width,
            min_height: options.min_height,
            top_region: options.top_region,
        })
    }

    /// Locate both targets
    pub fn locate(&self, tree: &DomTree) -> Targets {
        let targets = Targets {
            banner: self.locate_banner(tree),
            profile_picture: self.locate_profile_picture(tree),
        };
        log::debug!("{}", targets.status());
        targets
    }

    /// Locate the banner container
    pub fn locate_banner(&self, tree: &DomTree) -> Option<LocatedElement> {
        if let Some(found) = Self::first_known(tree, &self.banner_selectors) {
            return Some(found);
        }

        let candidates = self.candidates(tree);

        if let Some(found) = select_by_background(&candidates, self.min_width, self.min_height) {
            log::info!("Banner located by background heuristic at {}", found.path);
            return Some(LocatedElement {
                path: found.path.clone(),
                strategy: LocateStrategy::Background,
            });
        }

        if let Some(found) = select_top_largest(&candidates, self.min_width, self.min_height, self.top_region) {
            log::info!("Banner located by top-of-page scan at {}", found.path);
            return Some(LocatedElement {
                path: found.path.clone(),
                strategy: LocateStrategy::TopOfPage,
            });
        }

        log::warn!("Banner element not found");
        None
    }

    /// Locate the profile picture image
    pub fn locate_profile_picture(&self, tree: &DomTree) -> Option<LocatedElement> {
        let found = Self::first_known(tree, &self.profile_picture_selectors);
        if found.is_none() {
            log::debug!("Profile picture element not found");
        }
        found
    }

    fn first_known(tree: &DomTree, selectors: &[Selector]) -> Option<LocatedElement> {
        selectors.iter().find_map(|selector| {
            tree.query_selector(selector).map(|path| LocatedElement {
                path,
                strategy: LocateStrategy::KnownSelector(selector.as_str().to_string()),
            })
        })
    }

    /// Turn every element of the snapshot into a heuristic candidate
    pub fn candidates(&self, tree: &DomTree) -> Vec<Candidate> {
        let hinted: HashSet<NodePath> = self
            .hint_selectors
            .iter()
            .flat_map(|selector| tree.query_selector_all(selector))
            .collect();

        tree.elements()
            .into_iter()
            .map(|el| Candidate {
                hinted: hinted.contains(&el.path),
                tag_name: el.node.tag_name.clone(),
                bounding_box: el.node.bounding_box,
                has_background: el.node.has_custom_background(),
                path: el.path,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementNode;

    fn candidate(path: Vec<usize>, tag: &str, bbox: (f64, f64, f64, f64), bg: bool, hinted: bool) -> Candidate {
        Candidate {
            path: NodePath::from(path),
            tag_name: tag.to_string(),
            bounding_box: Some(BoundingBox::new(bbox.0, bbox.1, bbox.2, bbox.3)),
            has_background: bg,
            hinted,
        }
    }

    #[test]
    fn test_select_by_background_prefers_hinted() {
        let candidates = vec![
            candidate(vec![0], "div", (0.0, 0.0, 1200.0, 900.0), true, false),
            candidate(vec![1], "div", (0.0, 50.0, 800.0, 200.0), true, true),
        ];

        let picked = select_by_background(&candidates, 500.0, 100.0).unwrap();
        assert_eq!(picked.path, NodePath::from(vec![1]));
    }

    #[test]
    fn test_select_by_background_thresholds() {
        let candidates = vec![
            candidate(vec![0], "div", (0.0, 0.0, 500.0, 300.0), true, false),
            candidate(vec![1], "div", (0.0, 0.0, 800.0, 100.0), true, false),
            candidate(vec![2], "div", (0.0, 0.0, 800.0, 300.0), false, false),
            candidate(vec![3], "body", (0.0, 0.0, 800.0, 300.0), true, false),
        ];

        assert!(select_by_background(&candidates, 500.0, 100.0).is_none());
    }

    #[test]
    fn test_select_top_largest() {
        let candidates = vec![
            candidate(vec![], "html", (0.0, 0.0, 1400.0, 3000.0), false, false),
            candidate(vec![0], "div", (0.0, 40.0, 800.0, 200.0), false, false),
            candidate(vec![1], "div", (0.0, 60.0, 1000.0, 250.0), false, false),
            candidate(vec![2], "div", (0.0, 400.0, 1200.0, 900.0), false, false),
        ];

        let picked = select_top_largest(&candidates, 500.0, 100.0, 200.0).unwrap();
        assert_eq!(picked.path, NodePath::from(vec![1]));
    }

    #[test]
    fn test_select_top_largest_tie_keeps_document_order() {
        let candidates = vec![
            candidate(vec![0], "div", (0.0, 0.0, 800.0, 200.0), false, false),
            candidate(vec![1], "section", (0.0, 10.0, 800.0, 200.0), false, false),
        ];

        let picked = select_top_largest(&candidates, 500.0, 100.0, 200.0).unwrap();
        assert_eq!(picked.path, NodePath::from(vec![0]));
    }

    #[test]
    fn test_locate_known_selector_first() {
        let tree = DomTree::new(ElementNode::new("html").with_children(vec![ElementNode::new("body").with_children(
            vec![
                ElementNode::new("div")
                    .with_attribute("class", "cover")
                    .with_bounding_box(0.0, 0.0, 900.0, 300.0)
                    .with_computed_style("background-color", "rgb(1, 2, 3)"),
                ElementNode::new("div").with_attribute("class", "profile-background-image"),
            ],
        )]));

        let banner = ElementLocator::default().locate_banner(&tree).unwrap();
        assert_eq!(banner.path, NodePath::from(vec![0, 1]));
        assert_eq!(
            banner.strategy,
            LocateStrategy::KnownSelector(".profile-background-image".to_string())
        );
    }

    #[test]
    fn test_targets_status() {
        let targets = Targets::default();
        assert_eq!(targets.status(), "Banner not found");
    }
}
