//! DOM snapshot model
//!
//! This module provides the page-independent view of a host document that the
//! rest of the crate works against:
//! - ElementNode: a captured element with geometry and style information
//! - DomTree: the snapshot tree, addressed by NodePath
//! - Selector: CSS selector matching over the snapshot
//! - DomMutation / DomPatcher: recorded changes, replayable onto a live page

pub mod element;
pub mod mutation;
pub mod selector;
pub mod tree;

pub use element::{BoundingBox, ElementNode};
pub use mutation::{DomMutation, DomPatcher};
pub use selector::Selector;
pub use tree::{DomTree, ElementRef, NodePath};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_node_export() {
        let element = ElementNode::new("div");
        assert_eq!(element.tag_name, "div");
    }

    #[test]
    fn test_selector_export() {
        let selector = Selector::parse(".profile-background-image").unwrap();
        assert_eq!(selector.as_str(), ".profile-background-image");
    }

    #[test]
    fn test_dom_tree_export() {
        let tree = DomTree::new(ElementNode::new("html"));
        assert_eq!(tree.root.tag_name, "html");
        assert_eq!(tree.node(&NodePath::root()).map(|n| n.tag_name.as_str()), Some("html"));
    }
}
