use profile_customizer::config::CustomizerOptions;
use profile_customizer::dom::{DomTree, ElementNode, NodePath};
use profile_customizer::locator::{ElementLocator, LocateStrategy, RetryPolicy, locate_with_retry};
use std::time::Duration;

fn page(body: Vec<ElementNode>) -> DomTree {
    DomTree::new(ElementNode::new("html").with_children(vec![
        ElementNode::new("body")
            .with_bounding_box(0.0, 0.0, 1280.0, 3000.0)
            .with_children(body),
    ]))
}

#[test]
fn test_known_selector() {
    let tree = page(vec![
        ElementNode::new("div").with_attribute("class", "feed"),
        ElementNode::new("div")
            .with_attribute("class", "profile-topcard-background-image-edit")
            .with_bounding_box(0.0, 60.0, 800.0, 200.0),
    ]);

    let found = ElementLocator::default().locate_banner(&tree).unwrap();
    assert_eq!(found.path, NodePath::from(vec![0, 1]));
    assert_eq!(
        found.strategy,
        LocateStrategy::KnownSelector(".profile-topcard-background-image-edit".to_string())
    );
}

#[test]
fn test_background_heuristic() {
    let tree = page(vec![
        ElementNode::new("header").with_bounding_box(0.0, 0.0, 1280.0, 52.0),
        ElementNode::new("section")
            .with_attribute("class", "top-card")
            .with_bounding_box(0.0, 60.0, 800.0, 200.0)
            .with_computed_style("background-image", "url(https://cdn.example.com/cover.jpg)"),
        ElementNode::new("div")
            .with_bounding_box(0.0, 400.0, 800.0, 150.0)
            .with_computed_style("background-color", "rgba(0, 0, 0, 0)"),
    ]);

    let found = ElementLocator::default().locate_banner(&tree).unwrap();
    assert_eq!(found.path, NodePath::from(vec![0, 1]));
    assert_eq!(found.strategy, LocateStrategy::Background);
}

#[test]
fn test_top_of_page_fallback() {
    let tree = page(vec![
        ElementNode::new("div").with_bounding_box(0.0, 20.0, 600.0, 120.0),
        ElementNode::new("div").with_bounding_box(0.0, 150.0, 900.0, 240.0),
        ElementNode::new("div").with_bounding_box(0.0, 600.0, 1200.0, 900.0),
    ]);

    let found = ElementLocator::default().locate_banner(&tree).unwrap();
    assert_eq!(found.path, NodePath::from(vec![0, 1]));
    assert_eq!(found.strategy, LocateStrategy::TopOfPage);
}

#[test]
fn test_nothing_found() {
    let tree = page(vec![ElementNode::new("p").with_bounding_box(0.0, 10.0, 200.0, 20.0)]);
    let targets = ElementLocator::default().locate(&tree);

    assert!(targets.banner.is_none());
    assert!(targets.profile_picture.is_none());
    assert_eq!(targets.status(), "Banner not found");
}

#[test]
fn test_retry_until_banner_renders() {
    let late = page(vec![
        ElementNode::new("div")
            .with_attribute("class", "profile-background-image")
            .with_bounding_box(0.0, 60.0, 800.0, 200.0),
    ]);
    let empty = page(vec![]);

    let mut calls = 0;
    let located = locate_with_retry(
        &ElementLocator::default(),
        RetryPolicy::new(Duration::ZERO, 5),
        || {
            calls += 1;
            Ok(if calls < 3 { empty.clone() } else { late.clone() })
        },
    );

    let (tree, targets) = located.unwrap();
    assert_eq!(calls, 3);
    assert_eq!(tree, late);
    assert!(targets.banner.is_some());
}

#[test]
fn test_custom_selectors_from_options() {
    let mut options = CustomizerOptions::default();
    options.locator.banner_selectors = vec!["#cover".to_string()];
    let locator = ElementLocator::new(&options.locator).unwrap();

    let tree = page(vec![ElementNode::new("div").with_attribute("id", "cover")]);
    assert_eq!(locator.locate_banner(&tree).unwrap().path, NodePath::from(vec![0, 0]));
}
